mod metrics;
mod state;
