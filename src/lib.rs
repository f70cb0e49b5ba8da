pub mod alignment;
pub mod config;
pub mod error;
pub mod lexicon;
pub mod pipeline;
pub mod types;

pub use alignment::cost::{CostModel, ExclusiveSets, PhoneticCost, ReserveSet, UniformCost};
pub use alignment::levenshtein::{EditScript, ExpandedAlignment, Levenshtein};
pub use alignment::phone_stream::{PhoneStream, PhoneSymbol, Pronunciation};
pub use alignment::word_mapping::phone_align_to_word_align;
pub use config::{PhoneticCostConfig, PowerConfig};
pub use error::AlignmentError;
pub use lexicon::{Lexicon, PronunciationLookup};
pub use pipeline::builder::PowerAlignerBuilder;
pub use pipeline::runtime::{error_blocks, power_align, wer_align, PowerAligner};
pub use pipeline::traits::{Normalizer, Pronouncer};
pub use types::{
    Alignment, AlignmentInput, AlignmentOutput, AlignmentSlot, EditOp, ErrorCounts, Token,
};
