// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing what the system
// works with: labelled reviews, their encoded views, the
// metric records sent to the hosting platform, and the
// seams (traits) that other layers implement.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A labelled review and the encoded tensors derived from it
pub mod review;

// Structured step metrics reported to the platform
pub mod report;

// Core abstractions (traits) that other layers implement
pub mod traits;
