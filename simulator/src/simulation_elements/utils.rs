use num::{
    Float, Num,
    traits::{Inv, int::PrimInt},
};
use rand::Rng;
use rand_distr::{Distribution, Exp, Normal, uniform::SampleUniform};
use serde::Deserialize;
use std::{
    env::{self, VarError},
    num::{ParseFloatError, ParseIntError},
    str::FromStr,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum JsonValueError {
    #[error("Cannot Extract Environment Variable: {0}")]
    EnvVar(#[from] VarError),
    #[error("Invalid String to Float: {0}")]
    FloatFromStr(#[from] ParseFloatError),
    #[error("Invalid String to Int: {0}")]
    IntFromStr(#[from] ParseIntError),
    #[error("Uniform distribution has an empty range")]
    EmptyRange,
    #[error("Probability {0} is not between 0 and 1")]
    Probability(f64),
    #[error("Normal distribution has a negative standard deviation")]
    NegativeStandardDeviation,
    #[error("Invalid Normal Distribution: {0}")]
    NormalDistribution(#[from] rand_distr::NormalError),
    #[error("Invalid Exponential Distribution: {0}")]
    ExpDistribution(#[from] rand_distr::ExpError),
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum NumConstant<T> {
    Const(T),
    FromEnvVar(String),
}

impl<T> NumConstant<T>
where
    T: Num + FromStr + Copy,
    JsonValueError: From<<T as FromStr>::Err>,
{
    pub(crate) fn value(&self) -> Result<T, JsonValueError> {
        match self {
            Self::Const(v) => Ok(*v),
            Self::FromEnvVar(environment_variable) => Ok(env::var(environment_variable)?.parse()?),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum TextConstant {
    Text(String),
    TextEnv(String),
}

impl TextConstant {
    pub(crate) fn value(&self) -> Result<String, JsonValueError> {
        match self {
            Self::Text(v) => Ok(v.clone()),
            Self::TextEnv(environment_variable) => Ok(env::var(environment_variable)?),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case", tag = "random-type")]
pub(crate) enum FloatRandomDistribution<T> {
    ConstantFloat {
        value: NumConstant<T>,
    },
    UniformFloat {
        min: NumConstant<T>,
        max: NumConstant<T>,
    },
    Normal {
        mean: NumConstant<T>,
        sd: NumConstant<T>,
    },
    Exponential {
        lifetime: NumConstant<T>,
    },
}

impl<T> FloatRandomDistribution<T>
where
    T: Float + Inv<Output = T> + FromStr + SampleUniform,
    JsonValueError: From<<T as FromStr>::Err>,
    rand_distr::StandardNormal: rand_distr::Distribution<T>,
    rand_distr::Exp1: rand_distr::Distribution<T>,
{
    pub(crate) fn sample<R: Rng>(&self, rng: &mut R) -> Result<T, JsonValueError> {
        match self {
            Self::ConstantFloat { value } => value.value(),
            Self::UniformFloat { min, max } => {
                let (min, max) = (min.value()?, max.value()?);
                if min < max {
                    Ok(rng.random_range(min..max))
                } else {
                    Err(JsonValueError::EmptyRange)
                }
            }
            Self::Normal { mean, sd } => {
                let sd = sd.value()?;
                if sd < T::zero() {
                    return Err(JsonValueError::NegativeStandardDeviation);
                }
                Ok(Normal::new(mean.value()?, sd)?.sample(rng))
            }
            Self::Exponential { lifetime } => Ok(Exp::new(lifetime.value()?.inv())?.sample(rng)),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case", tag = "random-type")]
pub(crate) enum IntRandomDistribution<T> {
    ConstantInt {
        value: NumConstant<T>,
    },
    UniformInt {
        min: NumConstant<T>,
        max: NumConstant<T>,
    },
}

impl<T: PrimInt + FromStr + SampleUniform> IntRandomDistribution<T>
where
    JsonValueError: From<<T as FromStr>::Err>,
{
    pub(crate) fn sample<R: Rng>(&self, rng: &mut R) -> Result<T, JsonValueError> {
        match self {
            Self::ConstantInt { value } => value.value(),
            Self::UniformInt { min, max } => {
                let (min, max) = (min.value()?, max.value()?);
                if min < max {
                    Ok(rng.random_range(min..max))
                } else {
                    Err(JsonValueError::EmptyRange)
                }
            }
        }
    }
}
