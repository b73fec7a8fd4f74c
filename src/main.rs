// ==========================================
// 防洪闸泵群实时调度 - 命令行入口
// ==========================================
// 用法: flood-mpc [指标矩阵文件, 默认 data.txt]
// 输出: 熵权法指标权重 Weights: [w1, w2, ...]
// ==========================================

use anyhow::Context;
use flood_mpc::engine::entropy_weights;
use flood_mpc::importer::load_indicator_matrix;
use flood_mpc::logging;

const DEFAULT_DATA_FILE: &str = "data.txt";

fn main() -> anyhow::Result<()> {
    logging::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());

    tracing::info!(version = flood_mpc::VERSION, path = %path, "{}", flood_mpc::APP_NAME);

    let matrix = load_indicator_matrix(&path)
        .with_context(|| format!("无法读取指标矩阵: {}", path))?;
    let weights = entropy_weights(&matrix).context("熵权计算失败")?;

    println!("Weights: {}", weights);
    Ok(())
}
