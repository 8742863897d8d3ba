//! Meeting list logic: room detection, relevance, ad-hoc creation and
//! reconciliation.

pub mod adhoc;
pub mod ports;
pub mod reconcile;
pub mod relevance;
pub mod room;
pub mod service;
