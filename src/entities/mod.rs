pub mod cart_item;
pub mod category;
pub mod cut_to_size_quotation;
pub mod full_sheet_quotation;
pub mod grade;
pub mod product;
pub mod product_detail;
pub mod product_price;
pub mod size;
pub mod thickness;
pub mod user;
