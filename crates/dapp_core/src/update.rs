use crate::verdict::{is_certificate_code, strip_net_prefix};
use crate::{CertError, Effect, InvalidReason, Phase, ProbeEvent, ProbeSession, ProbeVerdict, SurfaceSignal};

/// Code reported when the surface goes away without a terminal signal.
pub const ABORTED_CODE: &str = "ERR_ABORTED";

/// Pure update function: applies an event to a probe session and returns any effects.
///
/// The first terminal event moves the session to [`Phase::Resolved`] and emits
/// [`Effect::Teardown`]; that transition happens once, so teardown is emitted
/// once. Everything after it is ignored.
pub fn update(mut session: ProbeSession, event: ProbeEvent) -> (ProbeSession, Vec<Effect>) {
    let effects = match (session.phase().clone(), event) {
        (Phase::Resolved(_), _) => {
            session.note_ignored();
            Vec::new()
        }
        (Phase::Idle, ProbeEvent::Start) => {
            session.set_phase(Phase::Navigating {
                awaiting_certificate: false,
            });
            vec![Effect::Navigate {
                url: session.target().to_string(),
            }]
        }
        (Phase::Idle, ProbeEvent::TimerFired) => {
            resolve(&mut session, ProbeVerdict::Invalid(InvalidReason::TimedOut))
        }
        (Phase::Idle, _) => {
            session.note_ignored();
            Vec::new()
        }
        (Phase::Navigating { .. }, ProbeEvent::Start) => {
            session.note_ignored();
            Vec::new()
        }
        (Phase::Navigating { awaiting_certificate }, ProbeEvent::Surface(signal)) => {
            on_surface_signal(&mut session, awaiting_certificate, signal)
        }
        (Phase::Navigating { .. }, ProbeEvent::TimerFired) => {
            resolve(&mut session, ProbeVerdict::Invalid(InvalidReason::TimedOut))
        }
        (Phase::Navigating { .. }, ProbeEvent::SignalsClosed) => resolve(
            &mut session,
            ProbeVerdict::Invalid(InvalidReason::Inaccessible {
                code: ABORTED_CODE.to_string(),
            }),
        ),
    };

    (session, effects)
}

fn on_surface_signal(
    session: &mut ProbeSession,
    awaiting_certificate: bool,
    signal: SurfaceSignal,
) -> Vec<Effect> {
    match signal {
        SurfaceSignal::LoadCompleted { final_url } => {
            // A TLS failure was already announced: a completion now cannot make the site valid.
            if awaiting_certificate {
                session.note_ignored();
                return Vec::new();
            }
            resolve(session, ProbeVerdict::Valid { final_url })
        }
        SurfaceSignal::LoadFailed { code } => {
            if is_certificate_code(&code) {
                session.set_phase(Phase::Navigating {
                    awaiting_certificate: true,
                });
                return Vec::new();
            }
            resolve(
                session,
                ProbeVerdict::Invalid(InvalidReason::Inaccessible {
                    code: strip_net_prefix(&code).to_string(),
                }),
            )
        }
        SurfaceSignal::CertificateError { code } => resolve(
            session,
            ProbeVerdict::Invalid(InvalidReason::CertificateInvalid(CertError::from_code(
                &code,
            ))),
        ),
    }
}

fn resolve(session: &mut ProbeSession, verdict: ProbeVerdict) -> Vec<Effect> {
    session.set_phase(Phase::Resolved(verdict));
    vec![Effect::Teardown]
}
