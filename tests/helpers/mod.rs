// Not every suite uses every builder.
#[allow(dead_code)]
pub mod stream;
