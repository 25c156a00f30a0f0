pub mod genome_model;
