use std::process::Command;

use anyhow::{Context, Result};

/// Opt-in tiers of `acelab-common`, lowest first.
const FEATURE_TIERS: &[&str] = &["foundation", "observability", "runtime", "platform"];

/// Check that each `acelab-common` tier compiles on its own.
pub fn test_feature_matrix() -> Result<()> {
    println!("Testing {} acelab-common feature tiers...", FEATURE_TIERS.len());

    for (index, tier) in FEATURE_TIERS.iter().enumerate() {
        println!(
            "\n[{}/{}] cargo check -p acelab-common --no-default-features --features {tier}",
            index + 1,
            FEATURE_TIERS.len(),
        );

        let status = Command::new("cargo")
            .args(["check", "-p", "acelab-common", "--no-default-features", "--features", tier])
            .status()
            .with_context(|| format!("Failed to run cargo check for '{tier}'"))?;

        if !status.success() {
            anyhow::bail!("Feature tier '{tier}' failed to compile");
        }

        println!("✅ Tier '{tier}' compiled successfully");
    }

    println!("\n✅ All {} feature tiers compile successfully!", FEATURE_TIERS.len());

    Ok(())
}
