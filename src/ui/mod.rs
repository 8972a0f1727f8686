pub mod cards;
pub mod search_bar;
pub mod theme;
pub mod toast;
