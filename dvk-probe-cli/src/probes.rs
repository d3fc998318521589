use anyhow::{Context, bail};
use dvk_probe_hal::discovery::{self, DiscoveredProbe, KNOWN_FAMILIES};
use dvk_probe_hal::{DapInfo, DapInfoValue, DapTransport, Error, ProbeSession, SessionConfig};

pub(crate) fn discover() -> anyhow::Result<Vec<DiscoveredProbe>> {
    discovery::discover_connected(KNOWN_FAMILIES).context("looking for connected probes")
}

pub(crate) fn list(probes: &[DiscoveredProbe], details: bool) -> anyhow::Result<()> {
    if probes.is_empty() {
        println!("No probes connected.");
    }
    for probe in probes {
        println!("{} ({})", probe.identity.unique_id, probe.family.name);
        for (role, port) in probe.ports.iter() {
            println!("    {role:?}: {}", port.path);
        }
        if details {
            let mut session = ProbeSession::connect(probe, SessionConfig::default())
                .with_context(|| format!("connecting to {}", probe.identity.unique_id))?;
            println!("    Board: {}", board(&mut session)?);
        }
    }
    Ok(())
}

/// Reported board vendor and name, or "unknown" if neither is set.
pub(crate) fn board<T: DapTransport>(session: &mut ProbeSession<T>) -> Result<String, Error> {
    let mut parts = Vec::new();
    for item in [DapInfo::TargetBoardVendor, DapInfo::TargetBoardName] {
        match session.info(item)? {
            DapInfoValue::Absent => {}
            DapInfoValue::Text(text) if text.is_empty() => {}
            value => parts.push(value.to_string()),
        }
    }
    if parts.is_empty() {
        return Ok("unknown".to_owned());
    }
    Ok(parts.join(" "))
}

#[cfg(test)]
mod test {
    use dvk_probe_hal::discovery::{DVK_PROBE, ProbeIdentity};
    use dvk_probe_hal::ports::{PortHandle, ProbePorts};
    use dvk_probe_hal::VendorCommand;

    use super::*;

    fn probe(id: &str) -> DiscoveredProbe {
        let port = |path: &str| PortHandle {
            path: path.into(),
            location: String::new(),
            serial_number: Some(id.into()),
        };
        DiscoveredProbe {
            identity: ProbeIdentity {
                unique_id: id.into(),
                vendor: DVK_PROBE.vendor.into(),
                product: DVK_PROBE.product.into(),
            },
            family: DVK_PROBE,
            ports: ProbePorts {
                shell: port("a"),
                data: port("b"),
                extra: Vec::new(),
            },
        }
    }

    #[test]
    fn select_by_id_or_only_probe() {
        let one = [probe("A")];
        let two = [probe("A"), probe("B")];
        assert_eq!(select(&one, None).unwrap().identity.unique_id, "A");
        assert_eq!(select(&two, Some("B")).unwrap().identity.unique_id, "B");
        assert!(select(&two, None).is_err());
        assert!(select(&two, Some("C")).is_err());
        assert!(select(&[], None).is_err());
    }

    /// Answers information requests with fixed board strings.
    struct Board(Option<&'static str>, Option<&'static str>);

    impl DapTransport for Board {
        fn open(&mut self) -> Result<(), Error> {
            Ok(())
        }
        fn close(&mut self) -> Result<(), Error> {
            Ok(())
        }
        fn is_open(&self) -> bool {
            true
        }
        fn vendor_request(&mut self, _: VendorCommand, _: &[u8]) -> Result<Vec<u8>, Error> {
            Ok(vec![0])
        }
        fn assert_reset(&mut self, _: bool) -> Result<(), Error> {
            Ok(())
        }
        fn identify(&mut self, info: DapInfo) -> Result<DapInfoValue, Error> {
            let text = match info {
                DapInfo::TargetBoardVendor => self.0,
                DapInfo::TargetBoardName => self.1,
                _ => None,
            };
            Ok(text.map_or(DapInfoValue::Absent, |t| DapInfoValue::Text(t.into())))
        }
    }

    fn board_of(id: &str, transport: Board) -> String {
        let mut session =
            ProbeSession::new(probe(id).identity, transport, SessionConfig::default()).unwrap();
        session.open().unwrap();
        board(&mut session).unwrap()
    }

    #[test]
    fn board_shows_vendor_and_name() {
        assert_eq!(
            board_of("board-full", Board(Some("Laird Connectivity"), Some("IF820"))),
            "Laird Connectivity IF820"
        );
        assert_eq!(board_of("board-name", Board(None, Some("IF820"))), "IF820");
        assert_eq!(board_of("board-blank", Board(Some(""), None)), "unknown");
    }
}
