use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::order::Order;

/// 从 CSV 文件加载全部订单
///
/// 整个文件解析并校验通过后才返回，格式错误的数据不会被部分处理。
pub fn load_orders_from_csv(csv_path: &Path) -> Result<Vec<Order>> {
    let file = std::fs::File::open(csv_path).map_err(|e| AppError::io(csv_path, e))?;
    read_orders(file, &csv_path.display().to_string())
}

/// 从任意输入读取订单，`source` 仅用于错误信息
pub fn read_orders<R: Read>(input: R, source: &str) -> Result<Vec<Order>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(input);

    let mut orders = Vec::new();
    let mut seen = HashSet::new();

    for (index, record) in reader.deserialize::<Order>().enumerate() {
        // 表头占第 1 行
        let row = index + 2;
        let order = record.map_err(|e| AppError::FeedParse {
            path: source.to_string(),
            source: e,
        })?;

        if order.order_number.trim().is_empty() {
            return Err(AppError::InvalidOrder {
                row,
                reason: "订单号为空".to_string(),
            });
        }
        if !seen.insert(order.file_key()) {
            return Err(AppError::InvalidOrder {
                row,
                reason: format!("订单号重复: {}", order.order_number),
            });
        }

        orders.push(order);
    }

    Ok(orders)
}
