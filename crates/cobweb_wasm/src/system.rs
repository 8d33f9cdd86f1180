//! Core WASM map wrapper and the operations the plotting layer calls.

use cobweb_core::analysis::{classify, derivative, lyapunov_exponent, StabilityReport};
use cobweb_core::cobweb::{trace, CobwebSegment, Domain, Point};
use cobweb_core::equation_engine::ExpressionMap;
use cobweb_core::fixed_point::{solve, FixedPointResult, FixedPointSettings};
use cobweb_core::maps::{LinearMap, LogisticMap};
use cobweb_core::traits::{Map, Scalar};
use cobweb_core::trajectory::{generate, generate_stochastic_seeded, StochasticTrajectory};
use serde::Serialize;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

pub(crate) enum SystemMap {
    Linear(LinearMap),
    Logistic(LogisticMap),
    Expression(ExpressionMap),
}

impl<T: Scalar> Map<T> for SystemMap {
    fn apply(&self, y: T) -> T {
        match self {
            SystemMap::Linear(m) => m.apply(y),
            SystemMap::Logistic(m) => m.apply(y),
            SystemMap::Expression(m) => m.apply(y),
        }
    }
}

/// Builds a map from its kind name. `params` are positional for the typed
/// maps (`[alpha, beta]`, `[r, K]`) and named by `param_names` for expressions.
pub(crate) fn build_map(
    kind: &str,
    params: &[f64],
    param_names: &[String],
    expression: &str,
    var_name: &str,
) -> Result<SystemMap, String> {
    match kind {
        "linear" => match params {
            [alpha, beta] => Ok(SystemMap::Linear(LinearMap::new(*alpha, *beta))),
            _ => Err(format!("linear map expects 2 parameters, got {}", params.len())),
        },
        "logistic" => match params {
            [r, k] => Ok(SystemMap::Logistic(LogisticMap::new(*r, *k))),
            _ => Err(format!("logistic map expects 2 parameters, got {}", params.len())),
        },
        "expression" => {
            if param_names.len() != params.len() {
                return Err(format!(
                    "parameter name/value mismatch: {} names, {} values",
                    param_names.len(),
                    params.len()
                ));
            }
            let named: Vec<(&str, f64)> = param_names
                .iter()
                .map(String::as_str)
                .zip(params.iter().copied())
                .collect();
            ExpressionMap::compile(expression, var_name, &named)
                .map(SystemMap::Expression)
                .map_err(|e| e.to_string())
        }
        other => Err(format!("Unknown map kind: {other}")),
    }
}

#[derive(Serialize)]
pub(crate) struct CobwebPayload {
    pub segments: Vec<CobwebSegment>,
    pub curve: Vec<Point>,
    pub domain: Domain,
}

#[wasm_bindgen]
pub struct WasmMap {
    pub(crate) map: SystemMap,
}

impl WasmMap {
    pub(crate) fn stochastic(
        &self,
        y0: f64,
        steps: usize,
        noise_variance: f64,
        seed: u64,
    ) -> Result<StochasticTrajectory, String> {
        generate_stochastic_seeded(&self.map, y0, steps, noise_variance, seed)
            .map_err(|e| e.to_string())
    }

    pub(crate) fn cobweb(
        &self,
        y0: f64,
        steps: usize,
        from: f64,
        to: f64,
        samples: usize,
    ) -> Result<CobwebPayload, String> {
        let segments = trace(&self.map, y0, steps).map_err(|e| e.to_string())?;
        let domain = Domain::new(from, to);
        Ok(CobwebPayload {
            segments,
            curve: domain.sample(&self.map, samples),
            domain,
        })
    }

    pub(crate) fn fixed_point(
        &self,
        y0: f64,
        tolerance: f64,
        max_iter: usize,
    ) -> Result<FixedPointResult, String> {
        let settings = FixedPointSettings {
            tolerance,
            max_iter,
        };
        solve(&self.map, y0, &settings).map_err(|e| e.to_string())
    }

    pub(crate) fn stability(&self, y_star: f64) -> StabilityReport {
        classify(&self.map, y_star)
    }
}

fn js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}

fn serialize<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[wasm_bindgen]
impl WasmMap {
    #[wasm_bindgen(constructor)]
    pub fn new(
        kind: &str,
        params: Vec<f64>,
        param_names: Vec<String>,
        expression: &str,
        var_name: &str,
    ) -> Result<WasmMap, JsValue> {
        console_error_panic_hook::set_once();

        let map = build_map(kind, &params, &param_names, expression, var_name).map_err(js_error)?;
        Ok(WasmMap { map })
    }

    pub fn apply(&self, y: f64) -> f64 {
        Map::<f64>::apply(&self.map, y)
    }

    pub fn generate(&self, y0: f64, steps: u32) -> Result<Vec<f64>, JsValue> {
        generate(&self.map, y0, steps as usize).map_err(|e| js_error(e.to_string()))
    }

    pub fn generate_stochastic(
        &self,
        y0: f64,
        steps: u32,
        noise_variance: f64,
        seed: u64,
    ) -> Result<JsValue, JsValue> {
        let run = self
            .stochastic(y0, steps as usize, noise_variance, seed)
            .map_err(js_error)?;
        serialize(&run)
    }

    /// Cobweb segments together with `samples` points of the map curve over
    /// `[from, to]`.
    pub fn trace(
        &self,
        y0: f64,
        steps: u32,
        from: f64,
        to: f64,
        samples: u32,
    ) -> Result<JsValue, JsValue> {
        let payload = self
            .cobweb(y0, steps as usize, from, to, samples as usize)
            .map_err(js_error)?;
        serialize(&payload)
    }

    pub fn sample_curve(&self, from: f64, to: f64, samples: u32) -> Result<JsValue, JsValue> {
        serialize(&Domain::new(from, to).sample(&self.map, samples as usize))
    }

    pub fn solve_fixed_point(
        &self,
        y0: f64,
        tolerance: f64,
        max_iter: u32,
    ) -> Result<JsValue, JsValue> {
        let result = self
            .fixed_point(y0, tolerance, max_iter as usize)
            .map_err(js_error)?;
        serialize(&result)
    }

    pub fn derivative(&self, y: f64) -> f64 {
        derivative(&self.map, y)
    }

    pub fn classify_fixed_point(&self, y_star: f64) -> Result<JsValue, JsValue> {
        serialize(&self.stability(y_star))
    }

    pub fn lyapunov_exponent(&self, y0: f64, steps: u32, transient: u32) -> Result<f64, JsValue> {
        lyapunov_exponent(&self.map, y0, steps as usize, transient as usize)
            .map_err(|e| js_error(e.to_string()))
    }
}
