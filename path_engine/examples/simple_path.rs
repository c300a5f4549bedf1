use path_engine::{compute_totals, writer, NodePair, PathValueCalculator, RawRecord};

fn main() {
    // Forward path from a generator node toward a load node
    let nodes = NodePair::new("GEN_NODE", "LOAD_NODE").expect("distinct nodes");
    let calculator = PathValueCalculator::new(nodes);

    // Two hours, three scenarios each. Scenario value is shared by both nodes;
    // distribution factors differ per node.
    let scenarios = [
        ("base", "low", 22.0, 0.40, 0.10),
        ("base", "high", 85.0, 0.55, 0.05),
        ("stress", "high", -15.0, 0.20, 0.60),
    ];

    let mut records = Vec::new();
    for hour in [17.0, 18.0] {
        for (rho, gamma, value, df_gen, df_load) in scenarios {
            let value = value * hour / 17.0;
            records.push(RawRecord::new(hour, "GEN_NODE", rho, gamma, value, df_gen));
            records.push(RawRecord::new(hour, "LOAD_NODE", rho, gamma, value, df_load));
        }
    }

    let hourly = calculator
        .calculate_from_records(&records)
        .expect("records cover the node pair");

    println!("Hourly Path Values");
    println!("==================");
    for row in hourly.rows() {
        println!("h={:>3}  {:<24} {:>12.4}", row.h.to_string(), row.path, row.v_hourly);
    }

    println!();
    println!("Totals");
    println!("======");
    for totals in compute_totals(&hourly) {
        println!("{}", writer::format_totals_line(&totals));
    }
}
