pub mod block_factory;
pub mod palette;
pub mod terminal;
pub mod workspace;
