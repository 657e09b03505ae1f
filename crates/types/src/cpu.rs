/// Processor description published on the control block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CpuInfo {
    /// Number of online logical cores.
    pub cpu_num: usize,
    pub vendor: String,
    pub brand: String,
    pub family: u32,
    pub model: u32,
    pub stepping: u32,
    /// Feature flags as reported by the host, space separated.
    pub flags: String,
}

/// Core-to-socket layout, part of the security context on isolated hosts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CpuTopology {
    pub online_logical_cores: usize,
    pub physical_cores_per_socket: usize,
    /// Socket id for each logical core, indexed by core number.
    pub cpu_socket: Vec<u32>,
}
