//! Bus event handlers run by the runtime.

pub mod bus_events;

pub use bus_events::BusEventHandler;
