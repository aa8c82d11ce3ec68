pub mod analyzer;
pub mod chart_canvas;
pub mod contests;
pub mod new_problem;
pub mod signup;
