pub mod chart_view;
