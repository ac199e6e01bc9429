pub mod assertions;
pub mod entity_builder;
pub mod loopback_sink;
pub mod test_scene;

pub use entity_builder::TestEntityBuilder;
pub use loopback_sink::LoopbackSink;
pub use test_scene::{replica_snapshot, TestScene};
