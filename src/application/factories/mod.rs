mod codec_factory;
mod collector_factory;
mod presenter_factory;

pub use codec_factory::CodecFactory;
pub use collector_factory::CollectorFactory;
pub use presenter_factory::{PresenterFactory, PresenterType};
