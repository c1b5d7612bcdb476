mod common;

use anyhow::Result;
use lockchart::trial::run;
use lockchart::{AccessIntent, Disposition, Mechanism, Request};

use common::{probe, scratch};

#[test]
fn exclusive_flock_writers_conflict() -> Result<()> {
    let tmp = scratch()?;
    let first = Request::new(
        tmp.path(),
        AccessIntent::WriteOnly,
        Disposition::Exclusive,
        Mechanism::WholeFileAdvisory,
    );

    let writer = Request::new(
        tmp.path(),
        AccessIntent::WriteOnly,
        Disposition::Exclusive,
        Mechanism::WholeFileAdvisory,
    );
    assert!(!run(&first, &writer, &probe())?);

    let reader = Request::new(
        tmp.path(),
        AccessIntent::ReadOnly,
        Disposition::None,
        Mechanism::WholeFileAdvisory,
    );
    assert!(run(&first, &reader, &probe())?);
    Ok(())
}

#[test]
fn shared_record_locks_coexist() -> Result<()> {
    let tmp = scratch()?;
    let request = Request::new(
        tmp.path(),
        AccessIntent::ReadOnly,
        Disposition::Shared,
        Mechanism::RecordLock,
    );
    assert!(run(&request, &request, &probe())?);
    Ok(())
}

#[test]
fn shared_flocks_coexist() -> Result<()> {
    let tmp = scratch()?;
    for (a, b) in [
        (AccessIntent::ReadOnly, AccessIntent::WriteOnly),
        (AccessIntent::ReadWrite, AccessIntent::ReadWrite),
    ] {
        let first = Request::new(tmp.path(), a, Disposition::Shared, Mechanism::WholeFileAdvisory);
        let second = Request::new(tmp.path(), b, Disposition::Shared, Mechanism::WholeFileAdvisory);
        assert!(run(&first, &second, &probe())?, "{a:?} vs {b:?}");
    }
    Ok(())
}

#[test]
fn mutual_exclusion_holds_for_every_mechanism() -> Result<()> {
    let tmp = scratch()?;
    for mechanism in Mechanism::ALL {
        for (a, b) in [
            (Disposition::Exclusive, Disposition::Exclusive),
            (Disposition::Exclusive, Disposition::Shared),
            (Disposition::Shared, Disposition::Exclusive),
        ] {
            let first = Request::new(tmp.path(), AccessIntent::ReadWrite, a, mechanism);
            let second = Request::new(tmp.path(), AccessIntent::ReadWrite, b, mechanism);
            assert!(
                !run(&first, &second, &probe())?,
                "{mechanism}: {a:?} vs {b:?} should conflict"
            );
        }
    }
    Ok(())
}

#[test]
fn no_lock_never_conflicts() -> Result<()> {
    let tmp = scratch()?;
    for locking in Mechanism::ALL {
        for other in Mechanism::ALL {
            for disposition in Disposition::ALL {
                let locked = Request::new(tmp.path(), AccessIntent::ReadWrite, disposition, locking);
                let unlocked =
                    Request::new(tmp.path(), AccessIntent::ReadWrite, Disposition::None, other);
                assert!(
                    run(&locked, &unlocked, &probe())?,
                    "{disposition:?} {locking} first, no lock {other} second"
                );
                assert!(
                    run(&unlocked, &locked, &probe())?,
                    "no lock {other} first, {disposition:?} {locking} second"
                );
            }
        }
    }
    Ok(())
}

#[test]
fn refused_holder_yields_false() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let missing = Request::new(
        dir.path().join("missing"),
        AccessIntent::ReadOnly,
        Disposition::None,
        Mechanism::OpenTimeReservation,
    );
    assert!(!run(&missing, &missing, &probe())?);
    Ok(())
}

#[test]
fn released_lock_does_not_leak_into_the_next_trial() -> Result<()> {
    let tmp = scratch()?;
    let exclusive = Request::new(
        tmp.path(),
        AccessIntent::ReadWrite,
        Disposition::Exclusive,
        Mechanism::RecordLock,
    );
    let unlocked = Request::new(
        tmp.path(),
        AccessIntent::ReadWrite,
        Disposition::None,
        Mechanism::RecordLock,
    );

    assert!(!run(&exclusive, &exclusive, &probe())?);
    // Holder without a lock: the contender only succeeds if nothing is left.
    assert!(run(&unlocked, &exclusive, &probe())?);
    Ok(())
}
