#[path = "property/bounds.rs"]
mod bounds;

#[path = "property/monotonicity.rs"]
mod monotonicity;

#[path = "property/compilation.rs"]
mod compilation;
