use persondb::{Person, StoreConfig, StoreHandle};
use tracing::info;
use tracing_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (INFO level; override with RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("PersonDB starting...");

    let store = StoreHandle::spawn(StoreConfig::default());

    let people = [
        Person::new("Alice", 40),
        Person::new("Baby Bob", 1),
        Person::new("Teen Carol", 13),
    ];

    println!("Before saving to the store...");
    for person in &people {
        println!("\t{}", person);
    }

    for person in people {
        store.save(person).await?;
    }

    println!("Lookup each person by name...");
    for name in ["Alice", "Baby Bob", "Teen Carol"] {
        match store.find_by_name(name).await? {
            Some(person) => println!("\t{}", person),
            None => println!("\t{} not found", name),
        }
    }

    println!("Adults (over 18):");
    for person in store.find_by_age_greater_than(18).await? {
        println!("\t{}", person);
    }

    println!("Babies (less than 5):");
    for person in store.find_by_age_less_than(5).await? {
        println!("\t{}", person);
    }

    println!("Teens (between 12 and 20):");
    for person in store.find_by_age_greater_than_and_less_than(12, 20).await? {
        println!("\t{}", person);
    }

    let stats = store.stats().await?;
    info!(
        "{} records stored, ~{} bytes",
        stats.records, stats.used_memory_bytes
    );

    Ok(())
}
