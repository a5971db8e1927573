pub const TOPIC_AC_STATE: &str = "acremote/ac/state";

pub const TOPIC_CMD_POWER: &str = "acremote/cmnd/power";
pub const TOPIC_CMD_TEMPERATURE: &str = "acremote/cmnd/temperature";
pub const TOPIC_CMD_TIMER: &str = "acremote/cmnd/timer";
