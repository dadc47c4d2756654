//! Result ordering and windowing

pub mod window;

pub use window::{
    apply_filters, filter_shared, order_for_view, rank_by_activity, rank_by_severity,
    rank_for_storage, take_window,
};
