//! The Network of Momentum (Zenon) indexer schema.

use super::database::ScalarType::{Bigint, Boolean, Integer, Jsonb, Real, Serial, Smallint, Text};
use super::database::{ColumnInfo as Col, ExampleQuery, TableInfo, TokenInfo};
use super::SchemaContext;

pub const ZNN_STANDARD: &str = "zts1znnxxxxxxxxxxxxx9z4ulx";
pub const QSR_STANDARD: &str = "zts1qsrxxxxxxxxxxxxxmrhjll";

const PREAMBLE: &str = "
You are a SQL query generator for the Network of Momentum (NoM/Zenon) blockchain database.

CRITICAL: ALL COLUMN NAMES ARE LOWERCASE! Even if they appear as camelCase in documentation, use lowercase in queries.
";

pub(super) fn schema_context() -> SchemaContext {
    SchemaContext {
        preamble: PREAMBLE,
        tables: tables(),
        notes: vec![
            "Token Standards: ZNN = 'zts1znnxxxxxxxxxxxxx9z4ulx', QSR = 'zts1qsrxxxxxxxxxxxxxmrhjll'",
            "All timestamps are Unix milliseconds (divide by 1000 for seconds)",
            "All amounts are in smallest unit (divide by decimals for display value)",
            "For ZNN and QSR: decimals = 8, so divide by 100000000 for display",
            "Addresses starting with 'z1' are valid Zenon addresses",
            "Contract addresses start with 'z1qxemdeddedx' (embedded contracts)",
            "Table names are lowercase without underscores (e.g., 'accountblocks' not 'account_blocks')",
            "Reward Types: 0 = Staking rewards (paid in QSR), 1 = Delegation rewards (paid in ZNN), 2 = Liquidity rewards, 3 = Sentinel rewards (paid in ZNN/QSR), 4 = Pillar rewards (paid in ZNN)",
        ],
        guidelines: vec![
            "Use lowercase table names",
            "Join tables appropriately based on relationships",
            "Convert timestamps for human-readable queries",
            "Consider token decimals when displaying amounts",
            "Use appropriate indexes (primary keys and unique constraints)",
        ],
        tokens: vec![
            TokenInfo {
                symbol: "ZNN",
                standard: ZNN_STANDARD,
                decimals: 8,
            },
            TokenInfo {
                symbol: "QSR",
                standard: QSR_STANDARD,
                decimals: 8,
            },
        ],
        examples: examples(),
        sample_questions: vec![
            "Show me all transactions over 1000 ZNN in the last 10 days",
            "What are the top 10 accounts by ZNN balance?",
            "List all active pillars with their voting activity",
            "Show me the total QSR burned this month",
            "Which accounts received the most staking rewards?",
            "What is the current total supply of ZNN?",
            "Show me all Accelerator-Z projects created in the last 30 days",
            "Which pillar has produced the most blocks?",
            "List accounts that have delegated to the top 5 pillars",
            "Show me plasma fusions expiring in the next 7 days",
        ],
    }
}

fn tables() -> Vec<TableInfo> {
    vec![
        TableInfo::new(
            "momentums",
            "Blockchain blocks/momentums",
            "Blockchain blocks",
            vec![
                Col::new("height", Bigint, "Block height number").primary_key(),
                Col::new("hash", Text, "Block hash"),
                Col::new("timestamp", Bigint, "Unix timestamp in milliseconds"),
                Col::new("txCount", Integer, "Number of transactions in the block"),
                Col::new("producer", Text, "Block producer address"),
                Col::new("producerOwner", Text, "Owner address of the block producer"),
                Col::new("producerName", Text, "Name of the producing pillar"),
            ],
        ),
        TableInfo::new(
            "accountblocks",
            "All transactions on the blockchain",
            "All transactions",
            vec![
                Col::new("hash", Text, "Transaction hash").primary_key(),
                Col::new("momentumHash", Text, "Hash of the momentum containing this transaction"),
                Col::new("momentumTimestamp", Bigint, "Timestamp of the containing momentum (Unix ms)"),
                Col::new("momentumHeight", Bigint, "Height of the containing momentum"),
                Col::new("blockType", Smallint, "Type of block (send/receive)"),
                Col::new("height", Bigint, "Account block height"),
                Col::new("address", Text, "Sender address"),
                Col::new("toAddress", Text, "Receiver address"),
                Col::new("amount", Bigint, "Amount transferred (in smallest unit)"),
                Col::new("tokenStandard", Text, "Token identifier (e.g., 'zts1znnxxxxxxxxxxxxx9z4ulx' for ZNN)"),
                Col::new("data", Text, "Additional transaction data"),
                Col::new("method", Text, "Contract method called (if applicable)"),
                Col::new("input", Jsonb, "Method input parameters"),
                Col::new("pairedAccountBlock", Text, "Hash of paired block (for send/receive pairs)"),
                Col::new("descendantOf", Text, "Parent block hash"),
            ],
        ),
        TableInfo::new(
            "accounts",
            "Account information",
            "Account information",
            vec![
                Col::new("address", Text, "Account address").primary_key(),
                Col::new("blockCount", Bigint, "Total number of blocks/transactions"),
                Col::new("publicKey", Text, "Account public key"),
                Col::new("delegate", Text, "Delegated pillar address"),
                Col::new("delegationStartTimestamp", Bigint, "When delegation started (Unix ms)"),
            ],
        ),
        TableInfo::new(
            "balances",
            "Current token balances",
            "Token balances",
            vec![
                Col::new("address", Text, "Account address"),
                Col::new("tokenStandard", Text, "Token identifier"),
                Col::new("balance", Bigint, "Current balance (in smallest unit)"),
            ],
        )
        .unique(&["address", "tokenStandard"]),
        TableInfo::new(
            "tokens",
            "Token information",
            "Token information",
            vec![
                Col::new("tokenStandard", Text, "Token identifier").primary_key(),
                Col::new("name", Text, "Token name"),
                Col::new("symbol", Text, "Token symbol"),
                Col::new("domain", Text, "Token domain"),
                Col::new("decimals", Integer, "Number of decimal places"),
                Col::new("owner", Text, "Token owner address"),
                Col::new("totalSupply", Bigint, "Total supply"),
                Col::new("maxSupply", Bigint, "Maximum supply"),
                Col::new("isBurnable", Boolean, "Can be burned"),
                Col::new("isMintable", Boolean, "Can be minted"),
                Col::new("isUtility", Boolean, "Is utility token"),
                Col::new("totalBurned", Bigint, "Total amount burned"),
                Col::new("lastUpdateTimestamp", Bigint, "Last update time (Unix ms)"),
                Col::new("holderCount", Bigint, "Number of holders"),
                Col::new("transactionCount", Bigint, "Total transactions"),
            ],
        ),
        TableInfo::new(
            "pillars",
            "Network pillars (validators)",
            "Network validators",
            vec![
                Col::new("owneraddress", Text, "Pillar owner address").primary_key(),
                Col::new("produceraddress", Text, "Block producer address"),
                Col::new("withdrawaddress", Text, "Reward withdrawal address"),
                Col::new("name", Text, "Pillar name"),
                Col::new("rank", Integer, "Current rank"),
                Col::new("givemomentumrewardpercentage", Smallint, "Momentum reward percentage"),
                Col::new("givedelegaterewardpercentage", Smallint, "Delegate reward percentage"),
                Col::new("isrevocable", Boolean, "Can be revoked"),
                Col::new("revokecooldown", Integer, "Revoke cooldown period"),
                Col::new("revoketimestamp", Bigint, "When revoked (Unix ms)"),
                Col::new("weight", Bigint, "Voting weight"),
                Col::new("epochproducedmomentums", Smallint, "Blocks produced this epoch"),
                Col::new("epochexpectedmomentums", Smallint, "Expected blocks this epoch"),
                Col::new("slotcostqsr", Bigint, "QSR cost for pillar slot"),
                Col::new("spawntimestamp", Bigint, "Creation time (Unix ms)"),
                Col::new("votingactivity", Real, "Voting participation rate"),
                Col::new("producedmomentumcount", Bigint, "Total blocks produced"),
                Col::new("isrevoked", Boolean, "Is revoked"),
            ],
        ),
        TableInfo::new(
            "sentinels",
            "Network sentinels",
            "Network sentinels",
            vec![
                Col::new("owner", Text, "Sentinel owner address").primary_key(),
                Col::new("registrationTimestamp", Bigint, "Registration time (Unix ms)"),
                Col::new("isRevocable", Boolean, "Can be revoked"),
                Col::new("revokeCooldown", Text, "Revoke cooldown"),
                Col::new("active", Boolean, "Is active"),
            ],
        ),
        TableInfo::new(
            "stakes",
            "ZNN staking entries",
            "ZNN staking entries",
            vec![
                Col::new("id", Text, "Stake ID").primary_key(),
                Col::new("address", Text, "Staker address"),
                Col::new("startTimestamp", Bigint, "Start time (Unix ms)"),
                Col::new("expirationTimestamp", Bigint, "Expiration time (Unix ms)"),
                Col::new("znnAmount", Bigint, "Amount staked"),
                Col::new("durationInSec", Integer, "Duration in seconds"),
                Col::new("isActive", Boolean, "Is currently active"),
                Col::new("cancelId", Text, "Cancellation ID"),
            ],
        ),
        TableInfo::new(
            "projects",
            "Accelerator-Z projects",
            "Accelerator-Z projects",
            vec![
                Col::new("id", Text, "Project ID").primary_key(),
                Col::new("votingId", Text, "Voting ID"),
                Col::new("owner", Text, "Project owner address"),
                Col::new("name", Text, "Project name"),
                Col::new("description", Text, "Project description"),
                Col::new("url", Text, "Project URL"),
                Col::new("znnFundsNeeded", Bigint, "ZNN funds requested"),
                Col::new("qsrFundsNeeded", Bigint, "QSR funds requested"),
                Col::new("creationTimestamp", Bigint, "Creation time (Unix ms)"),
                Col::new("lastUpdateTimestamp", Bigint, "Last update time (Unix ms)"),
                Col::new("status", Smallint, "Project status"),
                Col::new("yesVotes", Smallint, "Yes votes"),
                Col::new("noVotes", Smallint, "No votes"),
                Col::new("totalVotes", Smallint, "Total votes"),
            ],
        ),
        TableInfo::new(
            "projectphases",
            "Project phases",
            "Project phases",
            vec![
                Col::new("id", Text, "Phase ID").primary_key(),
                Col::new("projectId", Text, "Parent project ID"),
                Col::new("votingId", Text, "Voting ID"),
                Col::new("name", Text, "Phase name"),
                Col::new("description", Text, "Phase description"),
                Col::new("url", Text, "Phase URL"),
                Col::new("znnFundsNeeded", Bigint, "ZNN funds requested"),
                Col::new("qsrFundsNeeded", Bigint, "QSR funds requested"),
                Col::new("creationTimestamp", Bigint, "Creation time (Unix ms)"),
                Col::new("acceptedTimestamp", Bigint, "Acceptance time (Unix ms)"),
                Col::new("status", Smallint, "Phase status"),
                Col::new("yesVotes", Smallint, "Yes votes"),
                Col::new("noVotes", Smallint, "No votes"),
                Col::new("totalVotes", Smallint, "Total votes"),
            ],
        ),
        TableInfo::new(
            "votes",
            "Accelerator-Z votes",
            "Governance votes",
            vec![
                Col::new("id", Serial, "Vote ID").primary_key(),
                Col::new("momentumHash", Text, "Momentum hash"),
                Col::new("momentumTimestamp", Bigint, "Vote time (Unix ms)"),
                Col::new("momentumHeight", Bigint, "Vote block height"),
                Col::new("voterAddress", Text, "Voter address"),
                Col::new("projectId", Text, "Project ID"),
                Col::new("phaseId", Text, "Phase ID"),
                Col::new("votingId", Text, "Voting ID"),
                Col::new("vote", Smallint, "Vote value (0=no, 1=yes)"),
            ],
        ),
        TableInfo::new(
            "fusions",
            "Plasma fusions",
            "Plasma fusions",
            vec![
                Col::new("id", Text, "Fusion ID").primary_key(),
                Col::new("address", Text, "Provider address"),
                Col::new("beneficiary", Text, "Beneficiary address"),
                Col::new("momentumHash", Text, "Creation momentum hash"),
                Col::new("momentumTimestamp", Bigint, "Creation time (Unix ms)"),
                Col::new("momentumHeight", Bigint, "Creation block height"),
                Col::new("qsrAmount", Bigint, "QSR amount fused"),
                Col::new("expirationHeight", Bigint, "Expiration block height"),
                Col::new("isActive", Boolean, "Is currently active"),
                Col::new("cancelId", Text, "Cancellation ID"),
            ],
        ),
        TableInfo::new(
            "cumulativerewards",
            "Cumulative reward totals",
            "Reward totals",
            vec![
                Col::new("id", Serial, "Record ID").primary_key(),
                Col::new("address", Text, "Recipient address"),
                Col::new("rewardtype", Smallint, "Type of reward (0=Stake, 1=Delegation, 2=Liquidity, 3=Sentinel, 4=Pillar)"),
                Col::new("amount", Bigint, "Total amount received"),
                Col::new("tokenstandard", Text, "Token received (Staking rewards are in QSR, others in ZNN)"),
            ],
        )
        .unique(&["address", "rewardtype", "tokenstandard"]),
        TableInfo::new(
            "rewardtransactions",
            "Individual reward transactions",
            "Individual rewards",
            vec![
                Col::new("hash", Text, "Transaction hash").primary_key(),
                Col::new("address", Text, "Recipient address"),
                Col::new("rewardtype", Smallint, "Type of reward (lowercase!)"),
                Col::new("momentumtimestamp", Bigint, "Reward time (Unix ms) (lowercase!)"),
                Col::new("momentumheight", Bigint, "Reward block height (lowercase!)"),
                Col::new("accountheight", Bigint, "Account block height (lowercase!)"),
                Col::new("amount", Bigint, "Reward amount"),
                Col::new("tokenstandard", Text, "Token received (lowercase!)"),
                Col::new("sourceaddress", Text, "Source contract address (lowercase!)"),
            ],
        ),
    ]
}

fn examples() -> Vec<ExampleQuery> {
    vec![
        ExampleQuery {
            question: "Show me all transactions over 1000 ZNN in the last 10 days",
            sql: "SELECT
    ab.hash,
    ab.address as sender,
    ab.toaddress as receiver,
    ab.amount / 100000000.0 as znn_amount,
    to_timestamp(ab.momentumtimestamp / 1000) as transaction_time
FROM accountblocks ab
WHERE ab.tokenstandard = 'zts1znnxxxxxxxxxxxxx9z4ulx'
    AND ab.amount > 100000000000  -- 1000 ZNN * 10^8
    AND ab.momentumtimestamp > (EXTRACT(EPOCH FROM NOW() - INTERVAL '10 days') * 1000)
ORDER BY ab.momentumtimestamp DESC;",
        },
        ExampleQuery {
            question: "What are the top 10 accounts by ZNN balance?",
            sql: "SELECT
    b.address,
    b.balance / 100000000.0 as znn_balance
FROM balances b
WHERE b.tokenstandard = 'zts1znnxxxxxxxxxxxxx9z4ulx'
ORDER BY b.balance DESC
LIMIT 10;",
        },
        ExampleQuery {
            question: "List all active pillars with their voting activity",
            sql: "SELECT
    name,
    owneraddress,
    votingactivity,
    weight / 100000000.0 as weight_znn,
    producedmomentumcount
FROM pillars
WHERE isrevoked = false
ORDER BY rank ASC;",
        },
        ExampleQuery {
            question: "Show top 10 most active non-contract accounts",
            sql: "SELECT
    address,
    blockcount as transaction_count
FROM accounts
WHERE address NOT LIKE 'z1qxemdeddedx%'
ORDER BY blockcount DESC
LIMIT 10;",
        },
        ExampleQuery {
            question: "Show me the latest 10 ZNN transactions with their amounts",
            sql: "SELECT
    ab.hash,
    ab.address as sender,
    ab.toaddress as receiver,
    ab.amount / 100000000.0 as znn_amount,
    to_timestamp(ab.momentumtimestamp / 1000) as transaction_time
FROM accountblocks ab
WHERE ab.tokenstandard = 'zts1znnxxxxxxxxxxxxx9z4ulx'
    AND ab.amount > 0
ORDER BY ab.momentumtimestamp DESC
LIMIT 10;",
        },
        ExampleQuery {
            question: "What's the total count of transactions in the last 30 days",
            sql: "SELECT
    COUNT(*) as transaction_count,
    MIN(to_timestamp(momentumtimestamp / 1000)) as oldest_transaction,
    MAX(to_timestamp(momentumtimestamp / 1000)) as newest_transaction
FROM accountblocks
WHERE momentumtimestamp > (EXTRACT(EPOCH FROM NOW() - INTERVAL '30 days') * 1000);",
        },
    ]
}
