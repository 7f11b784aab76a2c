//! Clap derive structures for the `cloudcontrol` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

use cloudcontrol_core::{
    DiskRequest, DiskSpeed, FirewallAction, GatewayAddressing, IpVersion, NetworkDomainType,
    PortSpec, Protocol, RulePosition,
};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// cloudcontrol -- manage NTT CIS CloudControl resources
#[derive(Debug, Parser)]
#[command(
    name = "cloudcontrol",
    version,
    about = "Manage NTT CIS CloudControl infrastructure from the command line",
    long_about = "Declarative client for the CloudControl CaaS 2.x API.\n\n\
        Create, update and delete network domains, VLANs, servers, firewall\n\
        rules, NAT rules, port and IP address lists, and IP reservations.\n\
        Mutations are idempotent and can wait for the provider to settle.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "CLOUDCONTROL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Region key, e.g. na, eu, is-au (overrides profile)
    #[arg(long, short = 'r', env = "CLOUDCONTROL_REGION", global = true)]
    pub region: Option<String>,

    /// Output format (defaults to the configured one, else table)
    #[arg(long, short = 'o', env = "CLOUDCONTROL_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Skip TLS certificate verification
    #[arg(long, short = 'k', env = "CLOUDCONTROL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "CLOUDCONTROL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage network domains
    #[command(alias = "nd")]
    NetworkDomain(NetworkDomainArgs),

    /// Manage VLANs
    Vlan(VlanArgs),

    /// Manage servers
    #[command(alias = "srv")]
    Server(ServerArgs),

    /// Manage firewall rules
    #[command(alias = "fw")]
    Firewall(FirewallArgs),

    /// Manage NAT rules
    Nat(NatArgs),

    /// Manage firewall port lists
    PortList(PortListArgs),

    /// Manage firewall IP address lists
    IpList(IpListArgs),

    /// Public IP blocks and private address reservations
    Ipam(IpamArgs),

    /// Geographic regions, datacenters, operating systems and images
    Infra(InfraArgs),

    /// List the known API regions
    Regions,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Network domain selection shared by everything that lives inside one.
#[derive(Debug, Clone, Args)]
pub struct DomainArgs {
    /// Network domain id, or its name together with --datacenter
    #[arg(long = "network-domain", short = 'n', value_name = "DOMAIN")]
    pub network_domain: String,

    /// Datacenter used to resolve a network domain name (e.g. NA9)
    #[arg(long, short = 'd')]
    pub datacenter: Option<String>,
}

/// Convergence flags for mutating commands.
#[derive(Debug, Clone, Default, Args)]
pub struct WaitArgs {
    /// Wait until the provider reports the resource settled
    #[arg(long)]
    pub wait: bool,

    /// Longest to wait, in seconds
    #[arg(long, value_name = "SECS", requires = "wait")]
    pub wait_time: Option<u64>,

    /// Seconds between state polls
    #[arg(long, value_name = "SECS", requires = "wait")]
    pub wait_poll_interval: Option<u64>,

    /// Stop waiting as soon as a FAILED_* state shows up
    #[arg(long, requires = "wait")]
    pub fail_fast: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NETWORK DOMAINS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NetworkDomainArgs {
    #[command(subcommand)]
    pub command: NetworkDomainCommand,
}

#[derive(Debug, Subcommand)]
pub enum NetworkDomainCommand {
    /// List network domains
    #[command(alias = "ls")]
    List {
        /// Only domains in this datacenter
        #[arg(long, short = 'd')]
        datacenter: Option<String>,

        /// Only domains with this name
        #[arg(long)]
        name: Option<String>,

        /// Only domains of this type (ESSENTIALS, ADVANCED)
        #[arg(long = "type")]
        domain_type: Option<NetworkDomainType>,

        /// Only domains in this state (e.g. NORMAL)
        #[arg(long)]
        state: Option<String>,
    },

    /// Show one network domain
    Get {
        /// Network domain id, or its name together with --datacenter
        domain: String,

        #[arg(long, short = 'd')]
        datacenter: Option<String>,
    },

    /// Create a network domain (no-op when the name exists)
    Create {
        /// Datacenter id (e.g. NA9)
        #[arg(long, short = 'd')]
        datacenter: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// ESSENTIALS or ADVANCED
        #[arg(long = "type", default_value = "ESSENTIALS")]
        domain_type: NetworkDomainType,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Change a network domain's name, description or type
    Update {
        /// Network domain id, or its name together with --datacenter
        domain: String,

        #[arg(long, short = 'd')]
        datacenter: Option<String>,

        /// New name
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long = "type")]
        domain_type: Option<NetworkDomainType>,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Delete a network domain
    Delete {
        /// Network domain id, or its name together with --datacenter
        domain: String,

        #[arg(long, short = 'd')]
        datacenter: Option<String>,

        #[command(flatten)]
        wait: WaitArgs,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VLANS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VlanArgs {
    #[command(subcommand)]
    pub command: VlanCommand,
}

#[derive(Debug, Subcommand)]
pub enum VlanCommand {
    /// List VLANs in a network domain
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        domain: DomainArgs,

        /// Only VLANs with this name
        #[arg(long)]
        name: Option<String>,

        /// Only attached (true) or detached (false) VLANs
        #[arg(long)]
        attached: Option<bool>,
    },

    /// Show one VLAN
    Get {
        /// VLAN id, or its name together with --network-domain
        vlan: String,

        #[arg(long = "network-domain", short = 'n')]
        network_domain: Option<String>,

        #[arg(long, short = 'd')]
        datacenter: Option<String>,
    },

    /// Create a VLAN (no-op when the name exists)
    Create {
        #[command(flatten)]
        domain: DomainArgs,

        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// Private IPv4 network address, e.g. 10.0.0.0
        #[arg(long)]
        network: String,

        /// Private IPv4 prefix size
        #[arg(long, default_value = "24")]
        prefix: u8,

        /// Provider-managed gateway at the LOW or HIGH end of the range
        #[arg(long, conflicts_with = "detached_gateway")]
        gateway_addressing: Option<GatewayAddressing>,

        /// Customer-managed gateway address (detached VLAN)
        #[arg(long)]
        detached_gateway: Option<String>,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Change a VLAN
    Update {
        /// VLAN id
        vlan: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// IPv4 gateway (detached VLANs only)
        #[arg(long)]
        ipv4_gateway: Option<String>,

        /// IPv6 gateway (detached VLANs only)
        #[arg(long)]
        ipv6_gateway: Option<String>,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Delete a VLAN
    Delete {
        /// VLAN id
        vlan: String,

        #[command(flatten)]
        wait: WaitArgs,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SERVERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ServerArgs {
    #[command(subcommand)]
    pub command: ServerCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServerCommand {
    /// List servers
    #[command(alias = "ls")]
    List {
        /// Only servers in this network domain (id)
        #[arg(long = "network-domain", short = 'n')]
        network_domain: Option<String>,

        /// Only servers in this datacenter
        #[arg(long, short = 'd')]
        datacenter: Option<String>,

        /// Only servers with this name
        #[arg(long)]
        name: Option<String>,
    },

    /// Show one server
    Get {
        /// Server id
        server: String,
    },

    /// Deploy a server (no-op when the name exists in the domain)
    Create(Box<ServerCreateArgs>),

    /// Change CPU or memory (server must be stopped)
    Update {
        /// Server id
        server: String,

        #[arg(long)]
        cpu_count: Option<u32>,

        #[arg(long)]
        cores_per_socket: Option<u32>,

        /// STANDARD, HIGHPERFORMANCE, ...
        #[arg(long)]
        cpu_speed: Option<String>,

        #[arg(long)]
        memory_gb: Option<u32>,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Grow a disk (server must be stopped)
    ExpandDisk {
        /// Server id
        server: String,

        /// Disk id
        #[arg(long)]
        disk: String,

        /// New size in GB, larger than the current size
        #[arg(long)]
        size_gb: u32,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Power on
    Start {
        /// Server id
        server: String,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Graceful shutdown
    Stop {
        /// Server id
        server: String,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Graceful reboot
    Reboot {
        /// Server id
        server: String,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Delete a server, shutting it down first if running
    Delete {
        /// Server id
        server: String,

        #[command(flatten)]
        wait: WaitArgs,
    },
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("primary_nic").required(true).args(["vlan", "vlan_id", "private_ipv4"])))]
pub struct ServerCreateArgs {
    #[command(flatten)]
    pub domain: DomainArgs,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Source image id
    #[arg(long, required_unless_present = "image_name")]
    pub image: Option<String>,

    /// Source image name, looked up in --datacenter
    #[arg(long, conflicts_with = "image", requires = "datacenter")]
    pub image_name: Option<String>,

    /// Primary NIC VLAN name
    #[arg(long)]
    pub vlan: Option<String>,

    /// Primary NIC VLAN id
    #[arg(long)]
    pub vlan_id: Option<String>,

    /// Primary NIC private IPv4 address
    #[arg(long)]
    pub private_ipv4: Option<String>,

    /// Primary NIC adapter type (e.g. VMXNET3)
    #[arg(long)]
    pub network_adapter: Option<String>,

    /// Extra NIC as VLAN_NAME:ADAPTER (repeatable)
    #[arg(long = "nic", value_name = "VLAN:ADAPTER")]
    pub additional_nics: Vec<String>,

    /// Image disk as ID:SPEED[:IOPS] (repeatable)
    #[arg(long = "disk", value_name = "ID:SPEED[:IOPS]", value_parser = parse_disk)]
    pub disks: Vec<DiskRequest>,

    #[arg(long)]
    pub cpu_count: Option<u32>,

    #[arg(long)]
    pub cores_per_socket: Option<u32>,

    #[arg(long)]
    pub cpu_speed: Option<String>,

    #[arg(long)]
    pub memory_gb: Option<u32>,

    #[arg(long)]
    pub primary_dns: Option<String>,

    #[arg(long)]
    pub secondary_dns: Option<String>,

    #[arg(long)]
    pub ipv4_gateway: Option<String>,

    #[arg(long)]
    pub ipv6_gateway: Option<String>,

    /// Leave the server powered off after deployment
    #[arg(long)]
    pub no_start: bool,

    /// Deploy without guest OS customization
    #[arg(long)]
    pub no_customize: bool,

    /// Administrator password (generated when customizing and omitted)
    #[arg(long, env = "CLOUDCONTROL_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,

    #[command(flatten)]
    pub wait: WaitArgs,
}

/// `ID:SPEED[:IOPS]`
fn parse_disk(raw: &str) -> Result<DiskRequest, String> {
    let mut parts = raw.split(':');
    let (Some(id), Some(speed)) = (parts.next(), parts.next()) else {
        return Err(format!("expected ID:SPEED[:IOPS], got '{raw}'"));
    };
    let speed: DiskSpeed = speed
        .parse()
        .map_err(|_| format!("unknown disk speed '{speed}'"))?;
    let iops = parts
        .next()
        .map(|v| v.parse::<u32>().map_err(|_| format!("invalid IOPS '{v}'")))
        .transpose()?;
    if parts.next().is_some() {
        return Err(format!("expected ID:SPEED[:IOPS], got '{raw}'"));
    }
    Ok(DiskRequest {
        id: id.to_owned(),
        speed,
        iops,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FIREWALL
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct FirewallArgs {
    #[command(subcommand)]
    pub command: FirewallCommand,
}

#[derive(Debug, Subcommand)]
pub enum FirewallCommand {
    /// List firewall rules in a network domain
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        domain: DomainArgs,
    },

    /// Show one rule
    Get {
        /// Rule id
        rule: String,
    },

    /// Create a rule (no-op when the name exists)
    Create {
        #[command(flatten)]
        domain: DomainArgs,

        #[arg(long)]
        name: String,

        /// ACCEPT_DECISIVELY or DROP
        #[arg(long, default_value = "ACCEPT_DECISIVELY")]
        action: FirewallAction,

        /// IPV4 or IPV6
        #[arg(long, default_value = "IPV4")]
        ip_version: IpVersion,

        /// IP, ICMP, TCP or UDP
        #[arg(long, default_value = "TCP")]
        protocol: Protocol,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        destination: DestinationArgs,

        /// Create the rule disabled
        #[arg(long)]
        disabled: bool,

        /// FIRST, LAST, BEFORE or AFTER
        #[arg(long, default_value = "LAST")]
        position: RulePosition,

        /// Rule name BEFORE / AFTER refers to
        #[arg(long)]
        relative_to: Option<String>,
    },

    /// Change a rule; only the given fields are sent
    Update {
        /// Rule id
        rule: String,

        #[arg(long)]
        action: Option<FirewallAction>,

        #[arg(long)]
        protocol: Option<Protocol>,

        #[command(flatten)]
        source: OptionalSourceArgs,

        #[command(flatten)]
        destination: OptionalDestinationArgs,

        /// Enable (true) or disable (false) the rule
        #[arg(long)]
        enabled: Option<bool>,

        #[arg(long)]
        position: Option<RulePosition>,

        #[arg(long)]
        relative_to: Option<String>,
    },

    /// Delete a rule
    Delete {
        /// Rule id
        rule: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Source address, network, or ANY
    #[arg(long, required_unless_present = "src_ip_list")]
    pub src_ip: Option<String>,

    #[arg(long)]
    pub src_prefix: Option<u8>,

    /// Source IP address list name
    #[arg(long, conflicts_with = "src_ip")]
    pub src_ip_list: Option<String>,

    /// Source port, range (8000-8080) or ANY
    #[arg(long, required_unless_present = "src_port_list")]
    pub src_port: Option<PortSpec>,

    /// Source port list name
    #[arg(long, conflicts_with = "src_port")]
    pub src_port_list: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct DestinationArgs {
    /// Destination address, network, or ANY
    #[arg(long, required_unless_present = "dst_ip_list")]
    pub dst_ip: Option<String>,

    #[arg(long)]
    pub dst_prefix: Option<u8>,

    /// Destination IP address list name
    #[arg(long, conflicts_with = "dst_ip")]
    pub dst_ip_list: Option<String>,

    /// Destination port, range (8000-8080) or ANY
    #[arg(long, required_unless_present = "dst_port_list")]
    pub dst_port: Option<PortSpec>,

    /// Destination port list name
    #[arg(long, conflicts_with = "dst_port")]
    pub dst_port_list: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct OptionalSourceArgs {
    #[arg(long)]
    pub src_ip: Option<String>,

    #[arg(long)]
    pub src_prefix: Option<u8>,

    #[arg(long, conflicts_with = "src_ip")]
    pub src_ip_list: Option<String>,

    #[arg(long)]
    pub src_port: Option<PortSpec>,

    #[arg(long, conflicts_with = "src_port")]
    pub src_port_list: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct OptionalDestinationArgs {
    #[arg(long)]
    pub dst_ip: Option<String>,

    #[arg(long)]
    pub dst_prefix: Option<u8>,

    #[arg(long, conflicts_with = "dst_ip")]
    pub dst_ip_list: Option<String>,

    #[arg(long)]
    pub dst_port: Option<PortSpec>,

    #[arg(long, conflicts_with = "dst_port")]
    pub dst_port_list: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NAT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NatArgs {
    #[command(subcommand)]
    pub command: NatCommand,
}

#[derive(Debug, Subcommand)]
pub enum NatCommand {
    /// List NAT rules in a network domain
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        domain: DomainArgs,
    },

    /// Show one NAT rule
    Get {
        /// NAT rule id
        rule: String,
    },

    /// Translate an internal address (no-op when already translated)
    Create {
        #[command(flatten)]
        domain: DomainArgs,

        #[arg(long)]
        internal_ip: String,

        #[arg(long)]
        external_ip: String,
    },

    /// Delete a NAT rule
    Delete {
        /// NAT rule id
        rule: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PORT LISTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PortListArgs {
    #[command(subcommand)]
    pub command: PortListCommand,
}

#[derive(Debug, Subcommand)]
pub enum PortListCommand {
    /// List port lists in a network domain
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        domain: DomainArgs,
    },

    /// Show one port list
    Get {
        /// Port list id
        list: String,
    },

    /// Create a port list (no-op when the name exists)
    Create {
        #[command(flatten)]
        domain: DomainArgs,

        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// Port or range, e.g. 443 or 8000-8080 (repeatable)
        #[arg(long = "port", value_name = "PORT[-END]")]
        ports: Vec<String>,

        /// Child port list id (repeatable)
        #[arg(long = "child", value_name = "ID")]
        children: Vec<String>,
    },

    /// Change a port list
    Update {
        /// Port list id
        list: String,

        #[arg(long)]
        description: Option<String>,

        /// Replace the ports (repeatable)
        #[arg(long = "port", value_name = "PORT[-END]", conflicts_with = "clear_ports")]
        ports: Vec<String>,

        /// Remove every port
        #[arg(long)]
        clear_ports: bool,

        /// Replace the child lists (repeatable)
        #[arg(long = "child", value_name = "ID", conflicts_with = "clear_children")]
        children: Vec<String>,

        /// Remove every child list
        #[arg(long)]
        clear_children: bool,
    },

    /// Delete a port list
    Delete {
        /// Port list id
        list: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  IP ADDRESS LISTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct IpListArgs {
    #[command(subcommand)]
    pub command: IpListCommand,
}

#[derive(Debug, Subcommand)]
pub enum IpListCommand {
    /// List IP address lists in a network domain
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        domain: DomainArgs,
    },

    /// Show one IP address list
    Get {
        /// IP address list id
        list: String,
    },

    /// Create an IP address list (no-op when the name exists)
    Create {
        #[command(flatten)]
        domain: DomainArgs,

        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// IPV4 or IPV6
        #[arg(long, default_value = "IPV4")]
        version: IpVersion,

        /// Address, range (a-b) or network (a/prefix) (repeatable)
        #[arg(long = "entry", value_name = "ADDR[-END|/PREFIX]")]
        entries: Vec<String>,

        /// Child IP address list id (repeatable)
        #[arg(long = "child", value_name = "ID")]
        children: Vec<String>,
    },

    /// Change an IP address list
    Update {
        /// IP address list id
        list: String,

        #[arg(long)]
        description: Option<String>,

        /// Replace the entries (repeatable)
        #[arg(long = "entry", value_name = "ADDR[-END|/PREFIX]", conflicts_with = "clear_entries")]
        entries: Vec<String>,

        /// Remove every entry
        #[arg(long)]
        clear_entries: bool,

        /// Replace the child lists (repeatable)
        #[arg(long = "child", value_name = "ID", conflicts_with = "clear_children")]
        children: Vec<String>,

        /// Remove every child list
        #[arg(long)]
        clear_children: bool,
    },

    /// Delete an IP address list
    Delete {
        /// IP address list id
        list: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  IPAM
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct IpamArgs {
    #[command(subcommand)]
    pub command: IpamCommand,
}

#[derive(Debug, Subcommand)]
pub enum IpamCommand {
    /// Public IPv4 blocks of a network domain
    #[command(alias = "blocks")]
    PublicBlocks(PublicBlocksArgs),

    /// Private IPv4 / IPv6 reservations on VLANs
    #[command(alias = "reserved")]
    Reservations(ReservationsArgs),
}

#[derive(Debug, Args)]
pub struct PublicBlocksArgs {
    #[command(subcommand)]
    pub command: PublicBlocksCommand,
}

#[derive(Debug, Subcommand)]
pub enum PublicBlocksCommand {
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        domain: DomainArgs,
    },

    Get {
        /// Block id
        block: String,
    },

    /// Allocate a new block
    Add {
        #[command(flatten)]
        domain: DomainArgs,
    },

    /// Release a block
    Remove {
        /// Block id
        block: String,
    },
}

#[derive(Debug, Args)]
pub struct ReservationsArgs {
    #[command(subcommand)]
    pub command: ReservationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReservationsCommand {
    /// List reserved addresses on a VLAN or in a datacenter
    #[command(alias = "ls")]
    List {
        /// VLAN id
        #[arg(long, required_unless_present = "datacenter")]
        vlan: Option<String>,

        /// Datacenter id
        #[arg(long, short = 'd', conflicts_with = "vlan")]
        datacenter: Option<String>,

        /// IPV4 or IPV6
        #[arg(long, default_value = "IPV4")]
        version: IpVersion,
    },

    /// Reserve an address on a VLAN
    Reserve {
        /// VLAN id
        #[arg(long)]
        vlan: String,

        /// Address to reserve; its family picks IPv4 or IPv6
        #[arg(long)]
        ip: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Release a reservation
    Unreserve {
        /// VLAN id
        #[arg(long)]
        vlan: String,

        #[arg(long)]
        ip: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INFRASTRUCTURE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InfraArgs {
    #[command(subcommand)]
    pub command: InfraCommand,
}

#[derive(Debug, Subcommand)]
pub enum InfraCommand {
    /// Geographic regions visible to the account
    GeoRegions,

    /// Datacenters in the session's region
    #[command(alias = "dc")]
    Datacenters {
        /// Only this datacenter id
        #[arg(long)]
        id: Option<String>,
    },

    /// Operating systems offered in a datacenter
    #[command(alias = "os")]
    OperatingSystems {
        #[arg(long, short = 'd')]
        datacenter: String,

        /// Exact id, or a LIKE pattern with --like
        #[arg(long)]
        id: Option<String>,

        /// Exact name, or a LIKE pattern with --like
        #[arg(long)]
        name: Option<String>,

        /// Match --id / --name as LIKE patterns
        #[arg(long)]
        like: bool,

        /// e.g. UNIX, WINDOWS
        #[arg(long)]
        family: Option<String>,
    },

    /// Provider OS images, or customer images with --customer
    Images {
        #[arg(long, short = 'd')]
        datacenter: Option<String>,

        #[arg(long)]
        name: Option<String>,

        /// Customer images instead of provider images
        #[arg(long)]
        customer: bool,
    },

    /// Show one customer image
    Image {
        /// Image id
        image: String,
    },

    /// Import an OVF package as a customer image
    ImportImage {
        #[arg(long, short = 'd')]
        datacenter: String,

        /// OVF package (manifest) name in the account's FTPS area
        #[arg(long)]
        ovf_package: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// Allow guest OS customization on servers deployed from it
        #[arg(long)]
        guest_os_customization: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn disk_argument_parses() {
        let disk = parse_disk("d-1:PROVISIONEDIOPS:600").unwrap();
        assert_eq!(disk.id, "d-1");
        assert_eq!(disk.speed, DiskSpeed::ProvisionedIops);
        assert_eq!(disk.iops, Some(600));

        assert!(parse_disk("d-1").is_err());
        assert!(parse_disk("d-1:WARP").is_err());
        assert!(parse_disk("d-1:STANDARD:1:2").is_err());
    }

    #[test]
    fn wait_flags_require_wait() {
        let err = Cli::try_parse_from([
            "cloudcontrol",
            "vlan",
            "delete",
            "v-1",
            "--wait-time",
            "60",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
