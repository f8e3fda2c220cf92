//! Tax module containing the GST rate resolver and tax splitting rules

pub mod gst;

pub use gst::*;
