//! Background representation builder.
//!
//! Moves representation builds off the caller's thread. Requests go over
//! an mpsc channel; queued requests are coalesced so only the newest build
//! runs, and results come back through a lock-free triple buffer the
//! render thread polls without blocking.

use std::sync::{mpsc, Arc};

use crate::error::MolmeshError;
use crate::molecule::Molecule;
use crate::representation::{
    MoleculeDisplay, Representation, RepresentationBuilder,
};

/// Work sent to the processor thread.
#[derive(Debug)]
pub enum RepresentationRequest {
    /// Build `display` for `molecule`.
    Build {
        /// Identifies the request; larger tickets are newer.
        ticket: u64,
        /// Display mode to build.
        display: MoleculeDisplay,
        /// Molecule snapshot to build from.
        molecule: Arc<Molecule>,
    },
    /// Stop the thread.
    Shutdown,
}

/// Outcome of one background build.
#[derive(Debug, Clone)]
pub struct PreparedRepresentation {
    /// Ticket of the request this answers.
    pub ticket: u64,
    /// Display mode that was built.
    pub display: MoleculeDisplay,
    /// The representation, or why the build failed.
    pub outcome: Result<Arc<Representation>, Arc<MolmeshError>>,
}

/// Background thread that builds representations.
pub struct RepresentationProcessor {
    request_tx: mpsc::Sender<RepresentationRequest>,
    result: triple_buffer::Output<Option<PreparedRepresentation>>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl RepresentationProcessor {
    /// Spawn the processor thread. It owns `builder` for its lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`MolmeshError::ThreadSpawn`] if the thread fails to spawn.
    pub fn new(builder: RepresentationBuilder) -> Result<Self, MolmeshError> {
        let (request_tx, request_rx) = mpsc::channel();
        let (input, output) = triple_buffer::triple_buffer(&None);

        let thread = std::thread::Builder::new()
            .name("representation-processor".into())
            .spawn(move || Self::thread_loop(&builder, &request_rx, input))
            .map_err(MolmeshError::ThreadSpawn)?;

        Ok(Self {
            request_tx,
            result: output,
            thread: Some(thread),
        })
    }

    /// Queue a build (non-blocking). `ticket` is echoed back in the
    /// result; [`Scene::submit`](super::Scene::submit) issues them.
    pub fn submit(
        &self,
        ticket: u64,
        display: MoleculeDisplay,
        molecule: Arc<Molecule>,
    ) {
        let request = RepresentationRequest::Build {
            ticket,
            display,
            molecule,
        };
        if self.request_tx.send(request).is_err() {
            log::warn!(
                "representation processor is gone; dropped request {ticket}"
            );
        }
    }

    /// Non-blocking check for a completed build.
    pub fn try_recv(&mut self) -> Option<PreparedRepresentation> {
        let _ = self.result.update();
        self.result.output_buffer_mut().take()
    }

    /// Shut down the background thread and wait for it to finish.
    pub fn shutdown(&mut self) {
        let _ = self.request_tx.send(RepresentationRequest::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }

    fn thread_loop(
        builder: &RepresentationBuilder,
        request_rx: &mpsc::Receiver<RepresentationRequest>,
        mut output: triple_buffer::Input<Option<PreparedRepresentation>>,
    ) {
        while let Ok(request) = request_rx.recv() {
            match drain_latest(request, request_rx) {
                RepresentationRequest::Shutdown => break,
                RepresentationRequest::Build {
                    ticket,
                    display,
                    molecule,
                } => {
                    let outcome = builder
                        .build(display, &*molecule)
                        .map(Arc::new)
                        .map_err(Arc::new);
                    output.write(Some(PreparedRepresentation {
                        ticket,
                        display,
                        outcome,
                    }));
                }
            }
        }
    }
}

impl Drop for RepresentationProcessor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Drain queued requests, keeping only the latest. A queued shutdown is
/// never superseded.
fn drain_latest(
    initial: RepresentationRequest,
    rx: &mpsc::Receiver<RepresentationRequest>,
) -> RepresentationRequest {
    let mut latest = initial;
    while let Ok(newer) = rx.try_recv() {
        if !matches!(latest, RepresentationRequest::Shutdown) {
            latest = newer;
        }
    }
    latest
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use glam::Vec3;

    use super::*;
    use crate::mesh::{CylinderMeshBuilder, SphereMeshBuilder};
    use crate::molecule::{Atom, Bond, ElementTable};

    fn processor() -> RepresentationProcessor {
        RepresentationProcessor::new(RepresentationBuilder::new(
            SphereMeshBuilder::new(3, 4),
            CylinderMeshBuilder::new(4, None),
            ElementTable::standard(),
        ))
        .unwrap()
    }

    fn molecule() -> Arc<Molecule> {
        Arc::new(Molecule::new(
            vec![
                Atom::new(1, "N", "N"),
                Atom::new(2, "CA", "C").at(Vec3::new(1.46, 0.0, 0.0)),
            ],
            vec![Bond::new(0, 1)],
        ))
    }

    fn wait_for(
        processor: &mut RepresentationProcessor,
        ticket: u64,
    ) -> PreparedRepresentation {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(prepared) = processor.try_recv() {
                if prepared.ticket == ticket {
                    return prepared;
                }
            }
            assert!(Instant::now() < deadline, "timed out waiting for {ticket}");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn builds_in_background() {
        let mut processor = processor();
        processor.submit(1, MoleculeDisplay::BallAndStick, molecule());
        let prepared = wait_for(&mut processor, 1);
        assert_eq!(prepared.display, MoleculeDisplay::BallAndStick);
        let rep = prepared.outcome.unwrap();
        assert_eq!(rep.instance_count(), 4);
        assert!(processor.try_recv().is_none());
    }

    #[test]
    fn latest_request_wins() {
        let mut processor = processor();
        let mol = molecule();
        processor.submit(1, MoleculeDisplay::Spacefill, Arc::clone(&mol));
        processor.submit(2, MoleculeDisplay::BallAndStick, Arc::clone(&mol));
        processor.submit(3, MoleculeDisplay::SpacefillInstanced, mol);
        let prepared = wait_for(&mut processor, 3);
        assert_eq!(prepared.display, MoleculeDisplay::SpacefillInstanced);
    }

    #[test]
    fn failed_build_is_reported() {
        let mut processor = processor();
        let bad = Arc::new(Molecule::new(
            vec![Atom::new(1, "C", "C")],
            vec![Bond::new(0, 5)],
        ));
        processor.submit(7, MoleculeDisplay::Spacefill, bad);
        let prepared = wait_for(&mut processor, 7);
        assert!(matches!(
            prepared.outcome.as_ref().map_err(|e| &**e),
            Err(MolmeshError::MalformedTopology { .. })
        ));
    }

    #[test]
    fn drain_keeps_shutdown() {
        let (tx, rx) = mpsc::channel();
        tx.send(RepresentationRequest::Build {
            ticket: 2,
            display: MoleculeDisplay::Spacefill,
            molecule: molecule(),
        })
        .unwrap();
        let latest = drain_latest(RepresentationRequest::Shutdown, &rx);
        assert!(matches!(latest, RepresentationRequest::Shutdown));
    }
}
