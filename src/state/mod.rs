mod convert;
mod persistence;

pub use convert::{
    classify, default_range, locked_quantity, looks_like_seasoning, map_food_type, to_item,
    to_items,
};
pub use persistence::{apply_portions, load_records, save_records, write_portions_csv};
