pub mod capability;
pub mod manager;
pub mod mapper;
pub mod poller;
pub mod source;
pub mod state;
pub mod synthesizer;
pub mod target;

#[cfg(test)]
pub mod testing;

#[cfg(test)]
pub mod poller_test;
