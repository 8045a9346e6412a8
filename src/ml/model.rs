use burn::{
    nn::{
        conv::{Conv1d, Conv1dConfig},
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Initializer,
        Linear, LinearConfig,
        PaddingConfig1d,
    },
    prelude::*,
    tensor::activation::relu,
};

use crate::data::batcher::ReviewInput;
use crate::domain::review::{GridShape, RATING_CLASSES};

/// Gates regularisation: dropout only runs in `Train`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Train,
    Eval,
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct ModelConfig {
    #[config(default = 252)]
    pub character_size:   usize,
    #[config(default = 11173)]
    pub syllable_size:    usize,
    pub max_word_num:     usize,
    pub max_char_num:     usize,
    pub max_syll_num:     usize,
    pub word_dim:         usize,
    pub char_dim:         usize,
    pub syll_dim:         usize,
    /// Filters per character / syllable convolution
    pub n_units:          usize,
    /// Width of the word-level convolution stack and of the sentence vector
    pub rnn_dim:          usize,
    /// Kernel size of every convolution (odd)
    pub syll_filter_size: usize,
    pub cell_stack_count: usize,
    /// Drop probability, `1 - keep_prob`
    #[config(default = 0.2)]
    pub dropout:          f64,
}

impl ModelConfig {
    pub fn grid_shape(&self) -> GridShape {
        GridShape {
            max_word_num: self.max_word_num,
            max_char_num: self.max_char_num,
            max_syll_num: self.max_syll_num,
            word_dim:     self.word_dim,
        }
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> RatingModel<B> {
        let chars = SubwordConv::new(self.character_size, self.char_dim, self.n_units, self.syll_filter_size, device);
        let sylls = SubwordConv::new(self.syllable_size, self.syll_dim, self.n_units, self.syll_filter_size, device);

        let mut channels = self.word_dim + 2 * self.n_units;
        let mut word_convs = Vec::with_capacity(self.cell_stack_count);
        for _ in 0..self.cell_stack_count {
            word_convs.push(
                Conv1dConfig::new(channels, self.rnn_dim, self.syll_filter_size)
                    .with_padding(PaddingConfig1d::Same)
                    .init(device),
            );
            channels = self.rnn_dim;
        }

        let head = LinearConfig::new(self.rnn_dim, RATING_CLASSES)
            .with_initializer(Initializer::XavierUniform { gain: 1.0 })
            .init(device);

        RatingModel {
            chars,
            sylls,
            word_convs,
            head,
            dropout: DropoutConfig::new(self.dropout).init(),
        }
    }
}

// ─── SubwordConv ──────────────────────────────────────────────────────────────
/// Embedding table + convolution across one sub-word axis
/// (characters or syllables), max-pooled to one vector per word.
#[derive(Module, Debug)]
pub struct SubwordConv<B: Backend> {
    pub embedding: Embedding<B>,
    pub conv:      Conv1d<B>,
}

impl<B: Backend> SubwordConv<B> {
    fn new(vocab: usize, dim: usize, filters: usize, kernel: usize, device: &B::Device) -> Self {
        Self {
            embedding: EmbeddingConfig::new(vocab, dim).init(device),
            conv: Conv1dConfig::new(dim, filters, kernel)
                .with_padding(PaddingConfig1d::Same)
                .init(device),
        }
    }

    /// ids: [batch, words, units] → [batch, words, filters]
    pub fn forward(&self, ids: Tensor<B, 3, Int>) -> Tensor<B, 3> {
        let [batch, words, units] = ids.dims();

        let x = self.embedding.forward(ids.reshape([batch * words, units])); // [bw, units, dim]
        let x = relu(self.conv.forward(x.swap_dims(1, 2)));                  // [bw, filters, units]
        let [_, filters, _] = x.dims();

        x.max_dim(2).reshape([batch, words, filters])
    }
}

// ─── RatingModel ──────────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct RatingModel<B: Backend> {
    pub chars:      SubwordConv<B>,
    pub sylls:      SubwordConv<B>,
    pub word_convs: Vec<Conv1d<B>>,
    pub head:       Linear<B>,
    pub dropout:    Dropout,
}

impl<B: Backend> RatingModel<B> {
    fn regularize<const D: usize>(&self, x: Tensor<B, D>, mode: Mode) -> Tensor<B, D> {
        match mode {
            Mode::Train => self.dropout.forward(x),
            Mode::Eval  => x,
        }
    }

    /// Fixed-length sentence vector: [batch, rnn_dim].
    pub fn features(&self, input: ReviewInput<B>, mode: Mode) -> Tensor<B, 2> {
        let chars = self.chars.forward(input.chars);
        let sylls = self.sylls.forward(input.sylls);

        // Per word: [word vector | char features | syllable features]
        let x = Tensor::cat(vec![input.words, chars, sylls], 2); // [batch, words, channels]
        let mut x = self.regularize(x, mode).swap_dims(1, 2);   // [batch, channels, words]

        for conv in &self.word_convs {
            x = self.regularize(relu(conv.forward(x)), mode);
        }

        let [batch, width, _] = x.dims();
        x.max_dim(2).reshape([batch, width])
    }

    /// Ten non-negative class scores per review: [batch, 10].
    /// ReLU is applied to the final layer itself.
    pub fn forward(&self, input: ReviewInput<B>, mode: Mode) -> Tensor<B, 2> {
        relu(self.head.forward(self.features(input, mode)))
    }
}
