//! FlowMatrix 演示脚本
//!
//! 载入样例矩阵，求解最大流，编辑边后重新求解

use flowmatrix::algorithm::{solve_batch, EdmondsKarp, FlowProblem};
use flowmatrix::cli::{PrintMode, Printer};
use flowmatrix::import::MatrixReader;
use flowmatrix::metrics::global_metrics;
use flowmatrix::types::InputFormat;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("FlowMatrix 演示");
    println!("================\n");

    let mut capacity = MatrixReader::new(InputFormat::Text).read_path("demos/graph6.txt")?;
    let printer = Printer::new(PrintMode::Table);

    println!("1. 容量矩阵 ({} 节点, {} 条边)", capacity.size(), capacity.edge_count());
    print!("{}", printer.format_matrix(&capacity));

    println!("\n2. 求解 0 -> 5");
    let mut engine = EdmondsKarp::new().with_path_recording(true);
    let result = engine.solve(&capacity, 0, 5)?;
    print!("{}", printer.format_result(&result, 0, 5));
    println!("最小割边:");
    print!("{}", printer.format_edges(&result.min_cut_edges));

    println!("\n3. 修改 3 -> 5 容量为 10 后重新求解");
    capacity.set_capacity(3, 5, 10)?;
    let value = engine.compute_max_flow(&capacity, 0, 5)?;
    println!("最大流: {}", value);

    println!("\n4. 批量求解所有以 0 为源点的问题");
    let problems: Vec<FlowProblem> = (1..capacity.size())
        .map(|sink| FlowProblem::new(capacity.clone(), 0, sink))
        .collect();
    for (problem, result) in problems.iter().zip(solve_batch(&problems, false)) {
        match result {
            Ok(flow) => println!("  0 -> {}: {}", problem.sink, flow.value),
            Err(e) => println!("  0 -> {}: {}", problem.sink, e),
        }
    }

    println!("\n5. 指标");
    print!("{}", printer.format_metrics(&global_metrics().snapshot()));

    Ok(())
}
