pub mod interface;
pub mod google;
pub mod openai;
pub mod factory;

pub use interface::{ASRInterface, RecognitionError};
pub use factory::ASRFactory;
