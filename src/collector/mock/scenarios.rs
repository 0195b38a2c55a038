//! Pre-built mock filesystem scenarios for testing.
//!
//! These scenarios provide realistic `/sys` and `/proc` states for a
//! BQL-capable network interface.

use super::filesystem::MockFs;

/// Builds the byte_queue_limits directory path for a queue.
fn bql_dir(iface: &str, queue: usize) -> String {
    format!("/sys/class/net/{}/queues/tx-{}/byte_queue_limits", iface, queue)
}

impl MockFs {
    /// Creates a Linux 6.1 host with one interface and `tx_queues` transmit queues.
    ///
    /// Every queue starts with `inflight` = 8 KiB and `limit` = 30 KiB, driver `ixgbe 5.19.6`.
    /// Matching `rx-N` queues are present so TX counting is exercised.
    pub fn bql_interface(iface: &str, tx_queues: usize) -> Self {
        let mut fs = Self::new();

        fs.add_file("/proc/sys/kernel/ostype", "Linux\n");
        fs.add_file("/proc/sys/kernel/osrelease", "6.1.0-18-amd64\n");

        for q in 0..tx_queues {
            let dir = bql_dir(iface, q);
            fs.add_file(format!("{}/hold_time", dir), "1000\n");
            fs.add_file(format!("{}/inflight", dir), "8192\n");
            fs.add_file(format!("{}/limit", dir), "30720\n");
            fs.add_file(format!("{}/limit_max", dir), "1879048192\n");
            fs.add_file(format!("{}/limit_min", dir), "0\n");
            fs.add_file(
                format!("/sys/class/net/{}/queues/rx-{}/rps_cpus", iface, q),
                "00000000\n",
            );
        }

        fs.add_link(
            format!("/sys/class/net/{}/device/driver", iface),
            "../../../../bus/pci/drivers/ixgbe",
        );
        fs.add_file("/sys/module/ixgbe/version", "5.19.6\n");

        fs
    }

    /// Overwrites one raw BQL counter of a queue.
    pub fn set_counter(&self, iface: &str, queue: usize, attr: &str, raw: u64) {
        self.set_file(
            format!("{}/{}", bql_dir(iface, queue), attr),
            format!("{}\n", raw),
        );
    }

    /// Removes one BQL counter file so the next read of it fails.
    pub fn break_counter(&self, iface: &str, queue: usize, attr: &str) {
        self.remove_file(format!("{}/{}", bql_dir(iface, queue), attr));
    }
}
