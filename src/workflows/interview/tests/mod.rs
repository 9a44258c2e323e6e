mod common;
mod evaluation;
mod scoring;
