pub mod build_synmap;
pub mod prepare;
