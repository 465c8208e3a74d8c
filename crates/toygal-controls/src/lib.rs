#![forbid(unsafe_code)]

//! Custom-uniform control panels.
//!
//! A [`Panel`] is the gallery's stand-in for a GUI parameter panel: a set of
//! named values (sliders, toggles, colors) that an entry exposes as custom
//! uniforms. The runtime uploads the panel's snapshot before every draw via
//! the [`EntryControls`] contract; teardown is `Drop`, so switching entries
//! can never leak a panel.
//!
//! Panels can additionally be driven live over OSC (see [`OscParamReceiver`])
//! or loaded from a JSON description (see [`PanelConfig`]).

use std::collections::HashMap;
use std::io;
use std::net::UdpSocket;

use rosc::{OscPacket, OscType};
use serde::{Deserialize, Serialize};

use toygal_core::{EntryControls, UniformData, UniformValue};

/// One named control.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    Slider {
        value: f32,
        min: f32,
        max: f32,
        step: f32,
    },
    Toggle {
        value: bool,
    },
    Color {
        value: [f32; 3],
    },
}

impl ParamKind {
    fn uniform_data(&self) -> UniformData {
        match *self {
            ParamKind::Slider { value, .. } => UniformData::Float(value),
            ParamKind::Toggle { value } => UniformData::Bool(value),
            ParamKind::Color { value } => UniformData::Vec3(value),
        }
    }
}

/// A named set of controls for one entry instance.
#[derive(Debug, Default)]
pub struct Panel {
    label: String,
    params: Vec<Param>,
    by_name: HashMap<String, usize>,
    osc: Option<OscParamReceiver>,
}

impl Panel {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            params: Vec::new(),
            by_name: HashMap::new(),
            osc: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn slider(mut self, name: &str, value: f32, min: f32, max: f32, step: f32) -> Self {
        self.push(Param {
            name: name.to_string(),
            kind: ParamKind::Slider {
                value: value.clamp(min, max),
                min,
                max,
                step,
            },
        });
        self
    }

    pub fn toggle(mut self, name: &str, value: bool) -> Self {
        self.push(Param {
            name: name.to_string(),
            kind: ParamKind::Toggle { value },
        });
        self
    }

    pub fn color(mut self, name: &str, value: [f32; 3]) -> Self {
        self.push(Param {
            name: name.to_string(),
            kind: ParamKind::Color { value },
        });
        self
    }

    /// Attach a non-blocking OSC receiver; incoming `/param/<name>` floats
    /// update sliders and toggles on the next [`EntryControls::frame`].
    pub fn with_osc(mut self, rx: OscParamReceiver) -> Self {
        self.osc = Some(rx);
        self
    }

    fn push(&mut self, p: Param) {
        // Last declaration wins, like re-adding a controller to a GUI folder.
        if let Some(&i) = self.by_name.get(&p.name) {
            self.params[i] = p;
        } else {
            self.by_name.insert(p.name.clone(), self.params.len());
            self.params.push(p);
        }
    }

    /// Set a slider or toggle by name. Slider values clamp to their range;
    /// toggles treat anything > 0.5 as on. Unknown names are ignored.
    pub fn set(&mut self, name: &str, v: f32) {
        let Some(&i) = self.by_name.get(name) else {
            return;
        };
        match &mut self.params[i].kind {
            ParamKind::Slider {
                value, min, max, ..
            } => *value = v.clamp(*min, *max),
            ParamKind::Toggle { value } => *value = v > 0.5,
            ParamKind::Color { .. } => {}
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamKind> {
        self.by_name.get(name).map(|&i| &self.params[i].kind)
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Build a panel from a JSON description.
    pub fn from_config(cfg: &PanelConfig) -> Self {
        let mut panel = Panel::new(cfg.label.clone());
        for p in &cfg.params {
            panel.push(Param {
                name: p.name.clone(),
                kind: match p.kind {
                    ParamConfigKind::Slider {
                        value,
                        min,
                        max,
                        step,
                    } => ParamKind::Slider {
                        value: value.clamp(min, max),
                        min,
                        max,
                        step,
                    },
                    ParamConfigKind::Toggle { value } => ParamKind::Toggle { value },
                    ParamConfigKind::Color { value } => ParamKind::Color { value },
                },
            });
        }
        panel
    }
}

impl EntryControls for Panel {
    fn frame(&mut self) -> Vec<UniformValue> {
        if let Some(rx) = &mut self.osc {
            for (name, v) in rx.poll() {
                if let Some(&i) = self.by_name.get(&name) {
                    match &mut self.params[i].kind {
                        ParamKind::Slider {
                            value, min, max, ..
                        } => *value = v.clamp(*min, *max),
                        ParamKind::Toggle { value } => *value = v > 0.5,
                        ParamKind::Color { .. } => {}
                    }
                }
            }
        }

        self.params
            .iter()
            .map(|p| UniformValue::new(p.name.clone(), p.kind.uniform_data()))
            .collect()
    }
}

// -------------------------------------------------------------------------------------------------
// JSON description
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    pub label: String,
    #[serde(default)]
    pub params: Vec<ParamConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamConfig {
    pub name: String,
    #[serde(flatten)]
    pub kind: ParamConfigKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParamConfigKind {
    Slider {
        value: f32,
        min: f32,
        max: f32,
        #[serde(default = "default_step")]
        step: f32,
    },
    Toggle {
        value: bool,
    },
    Color {
        value: [f32; 3],
    },
}

fn default_step() -> f32 {
    0.01
}

// -------------------------------------------------------------------------------------------------
// OSC control plane
// -------------------------------------------------------------------------------------------------

/// Non-blocking UDP OSC receiver that extracts parameter messages.
///
/// Convention:
/// - Address: "/param/<name>" or "/<name>"
/// - Value: first argument, coercible to f32 (Float, Double, Int, Long)
///
/// rosc 0.10.x note: `rosc::decoder::decode_udp` is nom-style and returns
/// `Ok((rest, packet))` where `rest` is the unconsumed remainder.
#[derive(Debug)]
pub struct OscParamReceiver {
    sock: UdpSocket,
    buf: [u8; 2048],
}

impl OscParamReceiver {
    /// Bind to an address like "127.0.0.1:9000" in non-blocking mode.
    pub fn bind(addr: &str) -> io::Result<Self> {
        let sock = UdpSocket::bind(addr)?;
        sock.set_nonblocking(true)?;
        Ok(Self {
            sock,
            buf: [0u8; 2048],
        })
    }

    /// Drain the socket and return every parameter update available right now.
    pub fn poll(&mut self) -> Vec<(String, f32)> {
        let mut out: Vec<(String, f32)> = Vec::new();

        loop {
            match self.sock.recv_from(&mut self.buf) {
                Ok((n, _from)) => {
                    if let Ok((_rest, pkt)) = rosc::decoder::decode_udp(&self.buf[..n]) {
                        extract_from_packet(pkt, &mut out);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(_e) => break,
            }
        }

        out
    }
}

fn extract_from_packet(pkt: OscPacket, out: &mut Vec<(String, f32)>) {
    match pkt {
        OscPacket::Message(m) => {
            if let Some(kv) = parse_param_message(&m.addr, &m.args) {
                out.push(kv);
            }
        }
        OscPacket::Bundle(b) => {
            for p in b.content {
                extract_from_packet(p, out);
            }
        }
    }
}

fn parse_param_message(addr: &str, args: &[OscType]) -> Option<(String, f32)> {
    let name = addr.strip_prefix("/param/").or_else(|| addr.strip_prefix('/'))?;
    let v = match *args.first()? {
        OscType::Float(x) => x,
        OscType::Double(x) => x as f32,
        OscType::Int(x) => x as f32,
        OscType::Long(x) => x as f32,
        _ => return None,
    };
    Some((name.to_string(), v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_snapshots_are_idempotent() {
        let mut panel = Panel::new("test")
            .slider("u_max_radius", 0.08, 0.0, 0.5, 0.001)
            .toggle("u_double_hash", true);

        let a = panel.frame();
        let b = panel.frame();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].name, "u_max_radius");
        assert_eq!(a[0].data, UniformData::Float(0.08));
        assert_eq!(a[1].data, UniformData::Bool(true));
    }

    #[test]
    fn set_clamps_sliders_and_thresholds_toggles() {
        let mut panel = Panel::new("test")
            .slider("gain", 1.0, 0.0, 2.0, 0.1)
            .toggle("enabled", false);

        panel.set("gain", 9.0);
        panel.set("enabled", 1.0);
        panel.set("missing", 0.3); // ignored

        assert!(matches!(
            panel.get("gain"),
            Some(ParamKind::Slider { value, .. }) if (*value - 2.0).abs() < 1e-6
        ));
        assert!(matches!(
            panel.get("enabled"),
            Some(ParamKind::Toggle { value: true })
        ));
    }

    #[test]
    fn redeclaring_a_name_replaces_the_param() {
        let panel = Panel::new("test")
            .slider("x", 0.1, 0.0, 1.0, 0.01)
            .slider("x", 0.9, 0.0, 1.0, 0.01);
        assert_eq!(panel.params().len(), 1);
        assert!(matches!(
            panel.get("x"),
            Some(ParamKind::Slider { value, .. }) if (*value - 0.9).abs() < 1e-6
        ));
    }

    #[test]
    fn panel_config_json_round_trip() {
        let json = r#"{
            "label": "Rain",
            "params": [
                { "name": "u_max_radius", "kind": "slider", "value": 0.08, "min": 0.0, "max": 0.5 },
                { "name": "u_double_hash", "kind": "toggle", "value": false },
                { "name": "u_tint", "kind": "color", "value": [1.0, 0.5, 0.25] }
            ]
        }"#;
        let cfg: PanelConfig = serde_json::from_str(json).unwrap();
        let mut panel = Panel::from_config(&cfg);

        let vals = panel.frame();
        assert_eq!(vals.len(), 3);
        assert_eq!(vals[2].data, UniformData::Vec3([1.0, 0.5, 0.25]));
        // step falls back to the default when omitted
        assert!(matches!(
            panel.get("u_max_radius"),
            Some(ParamKind::Slider { step, .. }) if (*step - 0.01).abs() < 1e-6
        ));
    }

    #[test]
    fn osc_param_addresses_parse() {
        assert_eq!(
            parse_param_message("/param/u_gain", &[OscType::Float(0.5)]),
            Some(("u_gain".to_string(), 0.5))
        );
        assert_eq!(
            parse_param_message("/u_gain", &[OscType::Int(2)]),
            Some(("u_gain".to_string(), 2.0))
        );
        assert_eq!(parse_param_message("/param/u_gain", &[]), None);
        assert_eq!(
            parse_param_message("/param/s", &[OscType::String("x".into())]),
            None
        );
    }
}
