pub mod calendar_picker;
pub mod category_tabs;
pub mod item_card;
