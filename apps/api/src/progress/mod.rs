// Weight tracking: logged weigh-ins, trend statistics and the chart.

pub mod aggregator;
pub mod chart;
pub mod handlers;
