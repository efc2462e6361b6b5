//! # waypoint-ref-shop
//!
//! Shopping and wallet reference runtime for the Waypoint orchestrator.
//!
//! Demonstrates the plan-act-observe loop end to end using mock data:
//!
//! 1. **Shopping** — search, add to cart, check out in one call.
//! 2. **Out of stock** — the first pick has no stock; a corrective search is
//!    inserted and the purchase completes with an alternative.
//! 3. **Over budget** — the first pick exceeds the session budget; a cheaper
//!    search is inserted, bounded by the budget.
//! 4. **Research fallback** — the web search backend is down; the step's
//!    fallback skill answers instead.
//! 5. **User input** — nothing matches, the plan suspends with a prompt and
//!    resumes once the user names a product.
//! 6. **Wallet** — asset overview and airdrop discovery/claim.
//! 7. **Comparison** — independent lookups for each compared product.
//!
//! All data is hardcoded and fictional. No external API calls are made.

pub mod mock_data;
pub mod runtime;
pub mod scenarios;
pub mod skills;

pub use runtime::ShopRuntime;
pub use skills::Shop;
