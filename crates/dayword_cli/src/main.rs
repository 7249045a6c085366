//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `dayword_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("dayword_core ping={}", dayword_core::ping());
    println!("dayword_core version={}", dayword_core::core_version());
    println!("dayword_core day={}", dayword_core::current_day());
}
