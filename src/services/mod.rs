pub mod classifier;
pub mod data_input_service;
pub mod emission_calculator;
pub mod normalizer;
pub mod printable;
pub mod recommendation_engine;
pub mod report_assembler;
pub mod report_renderer;
pub mod report_service;
pub mod settings_service;
