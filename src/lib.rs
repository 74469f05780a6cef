//! bootshare - boot information handoff through a retained TLV area
//!
//! A bootloader appends typed facts to a small fixed-size region; the booted
//! application reads them back. See [`shared_data`] for the log itself and
//! [`boot_info`] for the facts the bootloader records.

pub mod backing;
pub mod boot_info;
pub mod cli;
pub mod observability;
pub mod shared_data;
