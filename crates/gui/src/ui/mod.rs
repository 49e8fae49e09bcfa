pub mod status_bar;
pub mod toolbar;
pub mod trail_list;
