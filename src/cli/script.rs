//! Call scripts
//!
//! A script names a demo target, a wrapping mode, declarative hooks and a
//! list of calls:
//!
//! ```json
//! {
//!   "target": "calculator",
//!   "mode": "proxy",
//!   "hooks": [
//!     { "on": "before:sub", "action": "swap_args" },
//!     { "on": "after:add", "action": { "scale_result": 2 } }
//!   ],
//!   "calls": [
//!     { "operation": "add", "args": [1, 2] },
//!     { "operation": "sub", "args": [1, 10] }
//!   ]
//! }
//! ```

use std::sync::{Arc, Mutex};

use interpose::{
    catch, fake_instance, proxy, track, Args, HookKey, HookPhase, InvokeError, Invoker, Object,
    Proxy, Value,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::catalog;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("unknown target '{0}' (available: {targets})", targets = catalog::TARGETS.join(", "))]
    UnknownTarget(String),

    #[error("mode '{mode}' does not take hooks")]
    HooksNotSupported { mode: ScriptMode },

    #[error("mode '{mode}' cannot apply {action} on '{on}'")]
    UnsupportedHook {
        mode: ScriptMode,
        on: String,
        action: &'static str,
    },

    #[error(transparent)]
    Invoke(#[from] InvokeError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptMode {
    /// Call the target directly.
    #[default]
    None,
    Proxy,
    Track,
    Catch,
    Fake,
}

impl std::fmt::Display for ScriptMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScriptMode::None => "none",
            ScriptMode::Proxy => "proxy",
            ScriptMode::Track => "track",
            ScriptMode::Catch => "catch",
            ScriptMode::Fake => "fake",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Reverse the positional arguments (proxy before-hooks).
    SwapArgs,
    /// Multiply a numeric result (proxy after-hooks).
    ScaleResult(f64),
    /// Replace the result (proxy after-hooks, catch `method_call`).
    Constant(Value),
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::SwapArgs => "swap_args",
            Action::ScaleResult(_) => "scale_result",
            Action::Constant(_) => "constant",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HookSpec {
    /// `before:<op>`, `after:<op>`, or `method_call` in catch mode.
    pub on: String,
    pub action: Action,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallSpec {
    pub operation: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    pub target: String,
    #[serde(default)]
    pub mode: ScriptMode,
    #[serde(default)]
    pub hooks: Vec<HookSpec>,
    /// Operations left untouched in fake mode.
    #[serde(default)]
    pub omit: Vec<String>,
    pub calls: Vec<CallSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallRecord {
    pub operation: String,
    pub args: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub target: String,
    pub mode: ScriptMode,
    pub calls: Vec<CallRecord>,
    /// Observations from tracker hooks, in call order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
}

/// Wrap the target as the script asks and run every call. Failing calls are
/// recorded in the report; only setup problems abort the run.
pub fn run(script: &Script) -> Result<Report, ScriptError> {
    let object = catalog::build(&script.target)
        .ok_or_else(|| ScriptError::UnknownTarget(script.target.clone()))?;
    if !script.omit.is_empty() && script.mode != ScriptMode::Fake {
        warn!(mode = %script.mode, "omit list only applies to fake mode; ignoring");
    }

    let events = Arc::new(Mutex::new(Vec::new()));
    let mut wrapper = wrap(script, object, &events)?;

    let calls = script
        .calls
        .iter()
        .map(|call| {
            debug!(operation = %call.operation, "script call");
            let outcome = wrapper.invoke(&call.operation, Args::new(call.args.clone()));
            let (result, error) = match outcome {
                Ok(value) => (Some(value), None),
                Err(err) => (None, Some(err.to_string())),
            };
            CallRecord {
                operation: call.operation.clone(),
                args: call.args.clone(),
                result,
                error,
            }
        })
        .collect();

    let events = events.lock().map(|e| e.clone()).unwrap_or_default();
    Ok(Report {
        target: script.target.clone(),
        mode: script.mode,
        calls,
        events,
    })
}

fn wrap(
    script: &Script,
    object: Object,
    events: &Arc<Mutex<Vec<String>>>,
) -> Result<Box<dyn Invoker>, ScriptError> {
    let no_hooks = || {
        if script.hooks.is_empty() {
            Ok(())
        } else {
            Err(ScriptError::HooksNotSupported { mode: script.mode })
        }
    };

    match script.mode {
        ScriptMode::None => {
            no_hooks()?;
            Ok(Box::new(object))
        }
        ScriptMode::Proxy => {
            let mut proxied = proxy(object);
            for hook in &script.hooks {
                install_proxy_hook(&mut proxied, hook)?;
            }
            Ok(Box::new(proxied))
        }
        ScriptMode::Track => {
            no_hooks()?;
            let mut tracker = track(object);
            let before = Arc::clone(events);
            tracker.before_call(move |operation, args| {
                record(&before, format!("before {}({})", operation, join(&args.values)))
            });
            let after = Arc::clone(events);
            tracker.after_call(move |operation, result| {
                record(&after, format!("after {} => {}", operation, result))
            });
            Ok(Box::new(tracker))
        }
        ScriptMode::Catch => {
            let mut catcher = catch(object);
            for hook in &script.hooks {
                match (&hook.action, hook.on.as_str()) {
                    (Action::Constant(value), "method_call") => {
                        let value = value.clone();
                        catcher.method_call(move |_, _, _| Ok(value.clone()));
                    }
                    (action, on) => {
                        return Err(ScriptError::UnsupportedHook {
                            mode: script.mode,
                            on: on.to_string(),
                            action: action.name(),
                        })
                    }
                }
            }
            Ok(Box::new(catcher))
        }
        ScriptMode::Fake => {
            no_hooks()?;
            let omit: Vec<&str> = script.omit.iter().map(String::as_str).collect();
            Ok(Box::new(fake_instance(object, &omit, |_| {})?))
        }
    }
}

fn install_proxy_hook(proxied: &mut Proxy<Object>, hook: &HookSpec) -> Result<(), ScriptError> {
    let key: HookKey = hook.on.parse()?;
    match (key.phase, &hook.action) {
        (HookPhase::Before, Action::SwapArgs) => {
            proxied.before(&key.operation, |mut args| {
                args.values.reverse();
                Ok(args)
            })?;
        }
        (HookPhase::After, Action::ScaleResult(factor)) => {
            let factor = *factor;
            proxied.after(&key.operation, move |result| scale(result, factor))?;
        }
        (HookPhase::After, Action::Constant(value)) => {
            let value = value.clone();
            proxied.after(&key.operation, move |_| Ok(value.clone()))?;
        }
        (_, action) => {
            return Err(ScriptError::UnsupportedHook {
                mode: ScriptMode::Proxy,
                on: hook.on.clone(),
                action: action.name(),
            })
        }
    }
    Ok(())
}

fn scale(value: Value, factor: f64) -> Result<Value, InvokeError> {
    let integral = factor.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(&factor);
    if let (Value::Int(n), true) = (&value, integral) {
        return n
            .checked_mul(factor as i64)
            .map(Value::Int)
            .ok_or_else(|| InvokeError::failed("scale_result: integer overflow"));
    }
    value
        .as_number()
        .map(|x| Value::Float(x * factor))
        .ok_or_else(|| InvokeError::failed(format!("scale_result: cannot scale {}", value.type_name())))
}

fn record(events: &Mutex<Vec<String>>, event: String) -> Result<(), InvokeError> {
    events
        .lock()
        .map_err(|_| InvokeError::failed("event log poisoned"))?
        .push(event);
    Ok(())
}

fn join(values: &[Value]) -> String {
    values
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
