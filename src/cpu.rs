//! Thread placement helper for callers that pin producer and consumer
//! threads to dedicated cores.

use crate::error::Result;

#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu_id: usize) -> Result<()> {
    use nix::sched::{sched_setaffinity, CpuSet};
    use nix::unistd::Pid;

    let mut cpu_set = CpuSet::new();
    cpu_set.set(cpu_id)?;
    sched_setaffinity(Pid::from_raw(0), &cpu_set)?;
    Ok(())
}

#[cfg(target_os = "macos")]
pub fn pin_to_cpu(cpu_id: usize) -> Result<()> {
    use libc::{mach_port_t, pthread_self, thread_affinity_policy_data_t, thread_policy_set};
    use libc::THREAD_AFFINITY_POLICY;

    unsafe {
        let mut policy = thread_affinity_policy_data_t {
            affinity_tag: cpu_id as i32,
        };

        let result = thread_policy_set(
            pthread_self() as mach_port_t,
            THREAD_AFFINITY_POLICY as u32,
            &mut policy as *mut _ as *mut i32,
            1,
        );

        if result != 0 {
            return Err(crate::error::SpineError::system_resource(
                "Failed to set CPU affinity",
            ));
        }
    }
    Ok(())
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub fn pin_to_cpu(_cpu_id: usize) -> Result<()> {
    Ok(())
}
