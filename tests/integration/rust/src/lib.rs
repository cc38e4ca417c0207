//! Integration test suite for the NumScript front end
//!
//! This crate provides integration tests that verify the scanner, parser,
//! printer and CLI work together across component boundaries.

/// Re-export components for test convenience
pub mod components {
    pub use core_types;
    pub use ns_cli;
    pub use parser;
}

/// Scripts in the shape ledger users write them, shared by the test files
pub mod fixtures {
    /// Plain transfer between two accounts
    pub const SIMPLE_SEND: &str = "send [EUR/2 100] (\n\tsource=@alice\n\tdestination=@bob\n)";

    /// Ride payment with metadata, variables supplied by the caller
    pub const RIDE: &str = r#"vars {
	account $rider
	account $driver
	string $description
	number $nb
	asset $ass
}
send [$ass 999] (
	source=$rider
	destination=$driver
)
set_tx_meta("description", $description)
set_tx_meta("ride", $nb)"#;

    /// Split between a driver and two fee accounts
    pub const SPLIT: &str = "send [GEM 15] (\n\tsource = @a\n\tdestination = {\n\t\t80% to @b\n\t\t$p to @c\n\t\tremaining to @d\n\t}\n)";

    /// Sweep every unit of an asset from two wallets
    pub const SWEEP: &str = "send [USD/2 *] (\n\tsource = {\n\t  @users:001:wallet\n\t  @users:001:credit\n\t}\n\tdestination = @platform\n)\n";

    /// Marketplace sale with commission taken from metadata
    pub const SALE: &str = r#"vars {
  account $sale
  account $seller = meta($sale, "seller")
  portion $commission = meta($sale, "commission")
  monetary $bal = balance($sale, EUR/2)
}

/* fees first, /* then */ the seller */
send $bal (
  destination = {
    $commission to @platform
    remaining to $seller
  }
  source = $sale allowing overdraft up to [EUR/2 10]
)
save [EUR/2 *] from $sale
"#;

    /// Capped destinations and nested allotments
    pub const WATERFALL: &str = r#"send [COIN 100] (
  source = {
    1/3 from @a
    remaining from {
      max [COIN 10] from @b
      @c allowing unbounded overdraft
    }
  }
  destination = {
    max [COIN 50] to {
      12.5% kept
      remaining to @fees
    }
    max $cap kept
    remaining to @rest
  }
)
print $cap > [COIN 5] && !($flag) ? "big" : "small"
fail
"#;
}
