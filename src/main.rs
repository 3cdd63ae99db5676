//! hashfi - Hedera DeFi transaction builder
//!
//! Run with: cargo run -- <command>
//!
//! Every write command produces either a prepared transaction (default)
//! or an on-ledger settlement, depending on EXECUTE_TX. Read commands
//! hit the JSON-RPC relay or the protocol REST APIs directly.

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use console::style;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod codec;
mod config;
mod context;
mod error;
mod executor;
mod market;
mod path;
mod protocols;
mod registry;
mod tokens;

use config::Config;
use context::RuntimeContext;
use market::{PlatformField, PlatformInterval};
use protocols::RateMode;
use registry::Network;

// ============================================
// CLI
// ============================================

#[derive(Parser)]
#[command(name = "hashfi", version, about = "Hedera DeFi transaction builder")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the active configuration
    Summary,

    /// List the built-in token table for the active network
    KnownTokens,

    // ========== SaucerSwap market data ==========
    /// All SaucerSwap tokens with prices
    Tokens,
    /// SaucerSwap platform statistics
    Stats,
    /// Single-sided staking statistics (SAUCE/xSAUCE ratio)
    SssStats,
    /// Historical HBAR prices between two Unix-second timestamps
    HbarPrices { from: u64, to: u64 },
    /// Platform-wide liquidity or volume series between two timestamps
    PlatformData {
        from: u64,
        to: u64,
        /// Bucket width: hour, day or week
        #[arg(long, default_value = "day")]
        interval: String,
        /// Series to fetch: liquidity or volume
        #[arg(long, default_value = "liquidity")]
        field: String,
    },
    /// Farm positions for one account
    AccountFarms { account_id: String },
    /// Tokens shown by default in the SaucerSwap UI
    DefaultTokens,
    /// Active yield farms
    Farms,
    /// V1 liquidity pools
    Pools,
    /// V2 concentrated-liquidity pools
    V2Pools,

    // ========== Bonzo market data ==========
    /// Lending market reserves
    Reserves,
    /// Lending positions for one account
    Account { account_id: String },
    /// Accounts eligible for liquidation
    Liquidations,
    /// Lending protocol configuration
    ProtocolConfig,

    // ========== Lending ==========
    /// On-chain account health from the lending pool
    AccountHealth { account_id: String },
    /// Supply an asset to the lending pool
    Deposit {
        asset: String,
        amount: String,
        #[arg(long)]
        on_behalf_of: Option<String>,
    },
    /// Withdraw a supplied asset
    Withdraw {
        asset: String,
        amount: String,
        #[arg(long)]
        to: Option<String>,
    },
    /// Borrow against supplied collateral
    Borrow {
        asset: String,
        amount: String,
        #[arg(long, default_value = "variable")]
        rate_mode: String,
        #[arg(long)]
        on_behalf_of: Option<String>,
    },
    /// Repay outstanding debt
    Repay {
        asset: String,
        amount: String,
        #[arg(long, default_value = "variable")]
        rate_mode: String,
        #[arg(long)]
        on_behalf_of: Option<String>,
    },
    /// Enable or disable an asset as collateral
    SetCollateral {
        asset: String,
        #[arg(long)]
        disable: bool,
    },

    // ========== Swaps ==========
    /// Quote an exact-input route (no state change)
    QuoteIn {
        /// Token route, comma-separated dotted ids or 0x addresses
        tokens: String,
        /// Pool fees per hop in hundredths of a bip, comma-separated
        fees: String,
        amount_in: String,
    },
    /// Quote an exact-output route (no state change)
    QuoteOut {
        tokens: String,
        fees: String,
        amount_out: String,
    },
    /// Swap an exact input amount along a route
    SwapIn {
        tokens: String,
        fees: String,
        amount_in: String,
        amount_out_minimum: String,
        #[arg(long)]
        recipient: Option<String>,
        #[arg(long)]
        deadline: Option<u64>,
    },
    /// Swap for an exact output amount along a route
    SwapOut {
        tokens: String,
        fees: String,
        amount_out: String,
        amount_in_maximum: String,
        #[arg(long)]
        recipient: Option<String>,
        #[arg(long)]
        deadline: Option<u64>,
    },
    /// Swap native HBAR for a token (wraps through WHBAR, refunds dust)
    SwapHbarForTokens {
        output_token: String,
        amount_in_tinybar: String,
        amount_out_minimum: String,
        #[arg(long, default_value_t = 3000)]
        fee: u32,
        #[arg(long)]
        recipient: Option<String>,
        #[arg(long)]
        deadline: Option<u64>,
    },
    /// Swap a token for native HBAR (unwraps WHBAR to the recipient)
    SwapTokensForHbar {
        input_token: String,
        amount_in: String,
        amount_out_minimum: String,
        #[arg(long, default_value_t = 3000)]
        fee: u32,
        #[arg(long)]
        recipient: Option<String>,
        #[arg(long)]
        deadline: Option<u64>,
    },

    // ========== Liquid staking ==========
    /// Stake HBAR (tinybars) for HBARX
    Stake { amount_tinybar: String },
    /// Unstake HBARX back to HBAR
    Unstake { amount_hbarx: String },
    /// Current HBARX/HBAR exchange rate
    ExchangeRate,

    // ========== Farms ==========
    /// Stake SAUCE for xSAUCE
    StakeSauce { amount: String },
    /// Unstake xSAUCE back to SAUCE
    UnstakeXsauce { amount: String },
    /// Deposit LP tokens into a farm pool
    FarmDeposit {
        pool_id: u64,
        amount: String,
        /// Deposit fee in tinybars, sent as the transaction value
        #[arg(long, default_value = "0")]
        deposit_fee_tinybar: String,
    },
    /// Withdraw LP tokens from a farm pool
    FarmWithdraw { pool_id: u64, amount: String },

    // ========== HeliSwap ==========
    /// HeliSwap pair snapshot: reserves, token order, LP supply
    HeliswapPair { token_a: String, token_b: String },
    /// HeliSwap constant-product output for an input amount
    HeliswapAmountOut {
        amount_in: String,
        reserve_in: String,
        reserve_out: String,
    },
}

// ============================================
// HELPERS
// ============================================

fn print_banner(config: &Config) {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(" hashfi - Hedera DeFi transaction builder").cyan().bold()
    );
    println!(
        "{}",
        style(format!(
            "    {:?} | {}",
            config.network,
            if config.execute_tx { "EXECUTE" } else { "PREPARE" }
        ))
        .cyan()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════").cyan()
    );
    println!();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn split_tokens(s: &str) -> Vec<String> {
    s.split(',').map(|t| t.trim().to_string()).collect()
}

fn split_fees(s: &str) -> Result<Vec<u32>> {
    s.split(',')
        .map(|f| f.trim().parse::<u32>().map_err(Into::into))
        .collect()
}

fn parse_interval(s: &str) -> Result<PlatformInterval> {
    match s.to_lowercase().as_str() {
        "hour" => Ok(PlatformInterval::Hour),
        "day" => Ok(PlatformInterval::Day),
        "week" => Ok(PlatformInterval::Week),
        other => Err(color_eyre::eyre::eyre!(
            "unknown interval {other:?}, expected hour, day or week"
        )),
    }
}

fn parse_field(s: &str) -> Result<PlatformField> {
    match s.to_lowercase().as_str() {
        "liquidity" => Ok(PlatformField::Liquidity),
        "volume" => Ok(PlatformField::Volume),
        other => Err(color_eyre::eyre::eyre!(
            "unknown field {other:?}, expected liquidity or volume"
        )),
    }
}

/// Annotate a token argument with its symbol when the built-in table
/// knows it.
fn format_token(network: Network, token: &str) -> String {
    codec::to_evm_address(token)
        .ok()
        .and_then(|addr| tokens::lookup_symbol(network, &addr))
        .map(|symbol| format!("{token} ({symbol})"))
        .unwrap_or_else(|| token.to_string())
}

fn format_route(network: Network, tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| format_token(network, t))
        .collect::<Vec<_>>()
        .join(" -> ")
}

// ============================================
// MAIN
// ============================================

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hashfi=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        error!("Please check your .env file");
        return Err(e);
    }

    // Summary and KnownTokens work without an operator id
    match &cli.command {
        Command::Summary => {
            print_banner(&config);
            config.print_summary();
            return Ok(());
        }
        Command::KnownTokens => {
            for token in tokens::known_tokens(config.network) {
                println!(
                    "{:>8}  {:<12}  {} decimals  {}",
                    token.symbol,
                    token.id.to_string(),
                    token.decimals,
                    token.id.to_evm_address()
                );
            }
            return Ok(());
        }
        _ => {}
    }

    let ctx = RuntimeContext::from_config(config)?;

    match cli.command {
        Command::Summary | Command::KnownTokens => unreachable!("handled above"),

        // ========== SaucerSwap market data ==========
        Command::Tokens => print_json(&ctx.saucerswap()?.tokens().await?)?,
        Command::Stats => print_json(&ctx.saucerswap()?.stats().await?)?,
        Command::SssStats => print_json(&ctx.saucerswap()?.sss_stats().await?)?,
        Command::HbarPrices { from, to } => {
            print_json(&ctx.saucerswap()?.hbar_prices(from, to).await?)?
        }
        Command::PlatformData {
            from,
            to,
            interval,
            field,
        } => print_json(
            &ctx.saucerswap()?
                .platform_data(from, to, parse_interval(&interval)?, parse_field(&field)?)
                .await?,
        )?,
        Command::AccountFarms { account_id } => {
            print_json(&ctx.saucerswap()?.account_farms(&account_id).await?)?
        }
        Command::DefaultTokens => print_json(&ctx.saucerswap()?.default_tokens().await?)?,
        Command::Farms => print_json(&ctx.saucerswap()?.farms().await?)?,
        Command::Pools => print_json(&ctx.saucerswap()?.pools().await?)?,
        Command::V2Pools => print_json(&ctx.saucerswap()?.v2_pools().await?)?,

        // ========== Bonzo market data ==========
        Command::Reserves => print_json(&ctx.bonzo().reserves().await?)?,
        Command::Account { account_id } => {
            print_json(&ctx.bonzo().account_dashboard(&account_id).await?)?
        }
        Command::Liquidations => print_json(&ctx.bonzo().liquidation_candidates().await?)?,
        Command::ProtocolConfig => print_json(&ctx.bonzo().protocol_config().await?)?,

        // ========== Lending ==========
        Command::AccountHealth { account_id } => {
            print_json(&ctx.lending().account_data(&account_id).await?)?
        }
        Command::Deposit {
            asset,
            amount,
            on_behalf_of,
        } => print_json(
            &ctx.lending()
                .deposit(&asset, &amount, on_behalf_of.as_deref())
                .await?,
        )?,
        Command::Withdraw { asset, amount, to } => print_json(
            &ctx.lending()
                .withdraw(&asset, &amount, to.as_deref())
                .await?,
        )?,
        Command::Borrow {
            asset,
            amount,
            rate_mode,
            on_behalf_of,
        } => {
            let mode = RateMode::parse(&rate_mode)?;
            print_json(
                &ctx.lending()
                    .borrow(&asset, &amount, mode, on_behalf_of.as_deref())
                    .await?,
            )?
        }
        Command::Repay {
            asset,
            amount,
            rate_mode,
            on_behalf_of,
        } => {
            let mode = RateMode::parse(&rate_mode)?;
            print_json(
                &ctx.lending()
                    .repay(&asset, &amount, mode, on_behalf_of.as_deref())
                    .await?,
            )?
        }
        Command::SetCollateral { asset, disable } => {
            print_json(&ctx.lending().set_collateral(&asset, !disable).await?)?
        }

        // ========== Swaps ==========
        Command::QuoteIn {
            tokens,
            fees,
            amount_in,
        } => {
            let route = split_tokens(&tokens);
            info!(route = %format_route(ctx.config.network, &route), "quoting exact input");
            print_json(
                &ctx.router()
                    .quote_exact_input(&route, &split_fees(&fees)?, &amount_in)
                    .await?,
            )?
        }
        Command::QuoteOut {
            tokens,
            fees,
            amount_out,
        } => {
            let route = split_tokens(&tokens);
            info!(route = %format_route(ctx.config.network, &route), "quoting exact output");
            print_json(
                &ctx.router()
                    .quote_exact_output(&route, &split_fees(&fees)?, &amount_out)
                    .await?,
            )?
        }
        Command::SwapIn {
            tokens,
            fees,
            amount_in,
            amount_out_minimum,
            recipient,
            deadline,
        } => {
            let route = split_tokens(&tokens);
            info!(route = %format_route(ctx.config.network, &route), "swapping exact input");
            print_json(
                &ctx.router()
                    .swap_exact_input(
                        &route,
                        &split_fees(&fees)?,
                        &amount_in,
                        &amount_out_minimum,
                        recipient.as_deref(),
                        deadline,
                    )
                    .await?,
            )?
        }
        Command::SwapOut {
            tokens,
            fees,
            amount_out,
            amount_in_maximum,
            recipient,
            deadline,
        } => {
            let route = split_tokens(&tokens);
            info!(route = %format_route(ctx.config.network, &route), "swapping exact output");
            print_json(
                &ctx.router()
                    .swap_exact_output(
                        &route,
                        &split_fees(&fees)?,
                        &amount_out,
                        &amount_in_maximum,
                        recipient.as_deref(),
                        deadline,
                    )
                    .await?,
            )?
        }
        Command::SwapHbarForTokens {
            output_token,
            amount_in_tinybar,
            amount_out_minimum,
            fee,
            recipient,
            deadline,
        } => {
            info!(
                output = %format_token(ctx.config.network, &output_token),
                "swapping HBAR for tokens"
            );
            print_json(
                &ctx.router()
                    .swap_hbar_for_tokens(
                        &output_token,
                        fee,
                        &amount_in_tinybar,
                        &amount_out_minimum,
                        recipient.as_deref(),
                        deadline,
                    )
                    .await?,
            )?
        }
        Command::SwapTokensForHbar {
            input_token,
            amount_in,
            amount_out_minimum,
            fee,
            recipient,
            deadline,
        } => {
            info!(
                input = %format_token(ctx.config.network, &input_token),
                "swapping tokens for HBAR"
            );
            print_json(
                &ctx.router()
                    .swap_tokens_for_hbar(
                        &input_token,
                        fee,
                        &amount_in,
                        &amount_out_minimum,
                        recipient.as_deref(),
                        deadline,
                    )
                    .await?,
            )?
        }

        // ========== Liquid staking ==========
        Command::Stake { amount_tinybar } => {
            print_json(&ctx.staking().stake(&amount_tinybar).await?)?
        }
        Command::Unstake { amount_hbarx } => {
            print_json(&ctx.staking().unstake(&amount_hbarx).await?)?
        }
        Command::ExchangeRate => print_json(&ctx.staking().exchange_rate().await?)?,

        // ========== Farms ==========
        Command::StakeSauce { amount } => print_json(&ctx.farm().stake_sauce(&amount).await?)?,
        Command::UnstakeXsauce { amount } => {
            print_json(&ctx.farm().unstake_xsauce(&amount).await?)?
        }
        Command::FarmDeposit {
            pool_id,
            amount,
            deposit_fee_tinybar,
        } => print_json(
            &ctx.farm()
                .farm_deposit(pool_id, &amount, &deposit_fee_tinybar)
                .await?,
        )?,
        Command::FarmWithdraw { pool_id, amount } => {
            print_json(&ctx.farm().farm_withdraw(pool_id, &amount).await?)?
        }

        // ========== HeliSwap ==========
        Command::HeliswapPair { token_a, token_b } => {
            info!(
                token_a = %format_token(ctx.config.network, &token_a),
                token_b = %format_token(ctx.config.network, &token_b),
                "fetching pair"
            );
            let info = ctx
                .heliswap()
                .pair_info(
                    codec::to_evm_address(&token_a)?,
                    codec::to_evm_address(&token_b)?,
                )
                .await?;
            print_json(&info)?
        }
        Command::HeliswapAmountOut {
            amount_in,
            reserve_in,
            reserve_out,
        } => print_json(
            &ctx.heliswap()
                .amount_out(&amount_in, &reserve_in, &reserve_out)
                .await?,
        )?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_token_annotates_known_symbols() {
        assert_eq!(
            format_token(Network::Mainnet, "0.0.731861"),
            "0.0.731861 (SAUCE)"
        );
        // unknown ids and unparseable input pass through untouched
        assert_eq!(format_token(Network::Mainnet, "0.0.99"), "0.0.99");
        assert_eq!(format_token(Network::Mainnet, "banana"), "banana");
    }

    #[test]
    fn test_format_route_joins_hops() {
        let route = vec!["0.0.456858".to_string(), "0.0.731861".to_string()];
        assert_eq!(
            format_route(Network::Mainnet, &route),
            "0.0.456858 (USDC) -> 0.0.731861 (SAUCE)"
        );
    }

    #[test]
    fn test_interval_and_field_parsing() {
        assert_eq!(parse_interval("Week").unwrap(), PlatformInterval::Week);
        assert!(parse_interval("month").is_err());
        assert_eq!(parse_field("volume").unwrap(), PlatformField::Volume);
        assert!(parse_field("tvl").is_err());
    }
}
