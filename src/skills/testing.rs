//! Minimal capability for unit tests: admits requests and leaves their
//! completion to the test.

use std::sync::Arc;

use super::base::SkillCore;
use super::request::{ParamsMap, SkillDelegate};
use super::skill::Skill;
use crate::pool::ManualWorkerPool;

#[derive(Debug)]
pub(crate) struct ProbeSkill {
    core: SkillCore,
}

pub(crate) fn probe_skill() -> Arc<ProbeSkill> {
    Arc::new(ProbeSkill {
        core: SkillCore::new(Arc::new(ManualWorkerPool::new())),
    })
}

impl Skill for ProbeSkill {
    fn core(&self) -> &SkillCore {
        &self.core
    }

    fn skill_type(&self) -> &'static str {
        "ProbeSkill"
    }

    fn can_use_skill(&self) -> bool {
        self.is_enabled()
    }

    fn use_skill(self: Arc<Self>, callback: SkillDelegate, params: ParamsMap) {
        self.core.admit(callback, params);
    }

    fn abort_skill(&self) -> bool {
        self.core.abort_all()
    }

    fn clone_skill(&self) -> Arc<dyn Skill> {
        Arc::new(ProbeSkill {
            core: self.core.clone_fresh(),
        })
    }
}
