//! Abstraction traits used by the transport layer (controller adapter,
//! synchronous transport capability, async bus).
pub mod bus_adapter;
pub mod can_bus;
pub mod can_transport;
