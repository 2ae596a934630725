//! Simulation controller.
//!
//! Plays the role of the execution environment: it owns the serial call
//! stream, resolves caller identity, and passes it into every state-changing
//! ledger operation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use fixedtoken_common::{AccountId, Amount};
use fixedtoken_ledger::TokenLedger;

use crate::accounts::AccountFactory;
use crate::metrics::WorkloadMetrics;
use crate::scenario::{AssertCondition, Scenario, ScenarioStep};

/// Controls a simulation over one ledger instance.
pub struct SimulationController {
    /// Random number generator.
    rng: StdRng,
    /// The ledger under test.
    ledger: TokenLedger,
    /// Participating accounts; index 0 is the treasury.
    accounts: Vec<AccountId>,
    /// Workload metrics.
    metrics: WorkloadMetrics,
    /// Error code of the most recent rejected operation.
    last_rejection: Option<String>,
}

impl SimulationController {
    /// Create a controller with a fresh ledger and account set.
    pub fn new(
        account_count: usize,
        supply: u128,
        token_name: &str,
        token_symbol: &str,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        let accounts = AccountFactory::create_accounts(account_count.max(2));
        let ledger = TokenLedger::new(
            token_name,
            token_symbol,
            Amount::new(supply),
            accounts[0].clone(),
        );

        info!(
            accounts = accounts.len(),
            supply = %supply,
            treasury = %accounts[0],
            "Simulation initialized"
        );

        Self {
            rng,
            ledger,
            accounts,
            metrics: WorkloadMetrics::new(),
            last_rejection: None,
        }
    }

    /// Run a random mixed workload of the three operations, checking the
    /// conservation invariant after every call.
    pub fn run_random(&mut self, operations: u64) -> anyhow::Result<()> {
        info!(operations, "Running random workload");

        for _ in 0..operations {
            let step = self.random_step();
            self.execute_step(&step)?;

            if !self.ledger.verify_conservation() {
                anyhow::bail!("conservation violated after {:?}", step);
            }
        }

        Ok(())
    }

    /// Run a scripted scenario.
    pub fn run_scenario(&mut self, scenario: Scenario) -> anyhow::Result<()> {
        info!("Running scenario: {} - {}", scenario.name, scenario.description);

        for step in &scenario.steps {
            self.execute_step(step)?;
        }

        Ok(())
    }

    /// Generate one random operation over the account set.
    fn random_step(&mut self) -> ScenarioStep {
        let account = |rng: &mut StdRng, accounts: &[AccountId]| {
            accounts[rng.gen_range(0..accounts.len())].as_str().to_string()
        };
        // Range past typical holdings so rejections show up in the tally
        let amount = self.rng.gen_range(0..self.ledger.total_supply().units() / 2 + 1);

        match self.rng.gen_range(0..3) {
            0 => ScenarioStep::Transfer {
                sender: account(&mut self.rng, &self.accounts),
                recipient: account(&mut self.rng, &self.accounts),
                amount,
            },
            1 => ScenarioStep::Approve {
                owner: account(&mut self.rng, &self.accounts),
                spender: account(&mut self.rng, &self.accounts),
                amount,
            },
            _ => ScenarioStep::TransferFrom {
                spender: account(&mut self.rng, &self.accounts),
                owner: account(&mut self.rng, &self.accounts),
                recipient: account(&mut self.rng, &self.accounts),
                amount,
            },
        }
    }

    /// Execute a single step.
    fn execute_step(&mut self, step: &ScenarioStep) -> anyhow::Result<()> {
        match step {
            ScenarioStep::Transfer {
                sender,
                recipient,
                amount,
            } => {
                let result = self.ledger.transfer(
                    &AccountId::new(sender),
                    &AccountId::new(recipient),
                    Amount::new(*amount),
                );
                self.record(result);
            }
            ScenarioStep::Approve {
                owner,
                spender,
                amount,
            } => {
                let result = self.ledger.approve(
                    &AccountId::new(owner),
                    &AccountId::new(spender),
                    Amount::new(*amount),
                );
                self.record(result);
            }
            ScenarioStep::TransferFrom {
                spender,
                owner,
                recipient,
                amount,
            } => {
                let result = self.ledger.transfer_from(
                    &AccountId::new(spender),
                    &AccountId::new(owner),
                    &AccountId::new(recipient),
                    Amount::new(*amount),
                );
                self.record(result);
            }
            ScenarioStep::Assert { condition } => {
                self.check(condition)?;
            }
        }

        Ok(())
    }

    /// Record an operation outcome in the metrics.
    fn record(&mut self, result: fixedtoken_common::Result<()>) {
        match result {
            Ok(()) => {
                self.metrics.record_accepted();
                self.last_rejection = None;
            }
            Err(err) => {
                warn!(code = err.error_code(), "Operation rejected: {}", err);
                self.metrics.record_rejected(err.error_code());
                self.last_rejection = Some(err.error_code().to_string());
            }
        }
    }

    /// Check one assertion against the ledger.
    fn check(&self, condition: &AssertCondition) -> anyhow::Result<()> {
        match condition {
            AssertCondition::BalanceEquals { account, amount } => {
                let actual = self.ledger.balance_of(&AccountId::new(account));
                if actual != Amount::new(*amount) {
                    anyhow::bail!(
                        "balance of {} is {}, expected {}",
                        account,
                        actual,
                        amount
                    );
                }
            }
            AssertCondition::AllowanceEquals {
                owner,
                spender,
                amount,
            } => {
                let actual = self
                    .ledger
                    .allowance(&AccountId::new(owner), &AccountId::new(spender));
                if actual != Amount::new(*amount) {
                    anyhow::bail!(
                        "allowance ({}, {}) is {}, expected {}",
                        owner,
                        spender,
                        actual,
                        amount
                    );
                }
            }
            AssertCondition::ConservationHolds => {
                if !self.ledger.verify_conservation() {
                    anyhow::bail!("conservation does not hold");
                }
            }
            AssertCondition::TransferEventCount { count } => {
                let actual = self.ledger.transfers().count();
                if actual != *count {
                    anyhow::bail!("{} Transfer events, expected {}", actual, count);
                }
            }
            AssertCondition::ApprovalEventCount { count } => {
                let actual = self.ledger.approvals().count();
                if actual != *count {
                    anyhow::bail!("{} Approval events, expected {}", actual, count);
                }
            }
            AssertCondition::LastRejectionCode { code } => {
                if self.last_rejection.as_deref() != Some(code.as_str()) {
                    anyhow::bail!(
                        "last rejection is {:?}, expected {}",
                        self.last_rejection,
                        code
                    );
                }
            }
        }

        Ok(())
    }

    /// Get the workload metrics.
    pub fn metrics(&self) -> &WorkloadMetrics {
        &self.metrics
    }

    /// Get the number of events the ledger has emitted.
    pub fn events_emitted(&self) -> usize {
        self.ledger.events().len()
    }
}
