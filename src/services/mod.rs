pub mod analysis_client;
pub mod analysis_worker;
pub mod api_client;
pub mod captcha;
pub mod chart_renderer;
pub mod config_loader;
pub mod contest_catalog;
pub mod problem_validator;
pub mod request_throttle;
pub mod sample_generator;
pub mod signup;
pub mod submission;
