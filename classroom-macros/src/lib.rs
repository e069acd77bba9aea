//! 课堂领域的过程宏
//!
//! - `#[entity]`：为聚合/实体追加 `id`、`version` 字段并实现 `Entity`
//! - `#[entity_id]`：为单字段 tuple struct 生成标识类型的常用实现
//! - `#[value_object]`：为值对象合并一组标准派生
//!
use proc_macro::TokenStream;

mod derive_utils;
mod entity;
mod entity_id;
mod value_object;

/// 实体宏
///
/// 参数：`#[entity(id = IdType, debug = true|false)]`，`id` 默认 `String`。
#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity::expand(attr, item)
}

/// 实体 ID 宏
///
/// 参数：`#[entity_id(copy = true|false)]`，为 `true` 时额外派生 `Copy`。
#[proc_macro_attribute]
pub fn entity_id(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity_id::expand(attr, item)
}

/// 值对象宏
#[proc_macro_attribute]
pub fn value_object(attr: TokenStream, item: TokenStream) -> TokenStream {
    value_object::expand(attr, item)
}
