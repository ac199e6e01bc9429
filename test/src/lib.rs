pub mod helpers;

pub mod shared {
    pub use replica_shared::*;
}

pub use helpers::*;
