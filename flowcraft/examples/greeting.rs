use flowcraft::prelude::*;

fn greeting_flow() -> Flow<String, String> {
    let greet_commoner = flow("Say hello", lift(|name: String| Ok(format!("Hello {name}"))));
    let greet_king = flow("Greet the king", lift(|_: String| Ok("Greetings, sire".to_string())));
    let greet_queen = flow("Greet the queen", lift(|_: String| Ok("Greetings, ma'am".to_string())));
    let is_king = Condition::new("is king", lift_predicate(|name: &String| name.contains("King")));
    let is_queen = Condition::new("is queen", lift_predicate(|name: &String| name.contains("Queen")));

    let leave_lowercase = flow("Leave lowercase", lift(|s: String| Ok::<_, anyhow::Error>(s)));
    let make_uppercase = flow("Uppercase", lift(|s: String| Ok(s.to_uppercase())));
    let is_hard_of_hearing =
        Condition::new("is hard of hearing", lift_predicate(|name: &String| name.contains("Floki")));

    let emphasise = flow("Add exclamation mark", lift(|s: String| Ok(format!("{s}!"))));

    greet_commoner
        .or_if(is_king, greet_king)
        .or_if(is_queen, greet_queen)
        .then(leave_lowercase.or_if(is_hard_of_hearing, make_uppercase))
        .then(emphasise)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    Logger::init_tracing();

    println!("=== FlowCraft Greeting Demo ===\n");

    let greet = greeting_flow();

    println!("1. Flow structure:");
    println!("{}\n", greet.describe());

    println!("2. Default execution:");
    for name in ["King Rollo", "Queen Quenfrith", "Floki"] {
        println!("  {name} -> {}", greet.run(name.to_string()).await?);
    }

    println!("\n3. Logged execution (set RUST_LOG=info to see the trace):");
    let logger = Logger::with_config(LoggerConfig::with_level(LogLevel::Info));
    let visitor = logger.visitor(DefaultFlowVisitor);
    let result = greet.run_with("Queen Quenfrith".to_string(), &visitor).await?;
    println!("  trace {} -> {result}", logger.trace_id);

    println!("\n=== Demo Completed ===");
    Ok(())
}
