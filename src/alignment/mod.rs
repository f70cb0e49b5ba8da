pub mod cost;
pub mod levenshtein;
pub mod normalize;
pub mod phone_stream;
pub mod word_mapping;
