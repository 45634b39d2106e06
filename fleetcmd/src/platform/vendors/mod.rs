//! Built-in vendor platform definitions.

pub mod cisco_ios;
pub mod extreme_exos;
pub mod juniper_junos;
pub mod mikrotik_routeros;
