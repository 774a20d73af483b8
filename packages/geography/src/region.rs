//! Fixed-radius facility clusters around a named reference point.

use std::collections::BTreeSet;

use geo::{Centroid as _, MultiPoint, Point};
use journey_map_geography_models::{Coordinate, Facility, FacilityDirectory};
use serde::{Deserialize, Serialize};

use crate::{Distance, distance};

/// A named reference point and radius defining a region cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    /// Display name (e.g. "Chicago Area").
    pub name: String,
    /// Reference latitude.
    pub latitude: f64,
    /// Reference longitude.
    pub longitude: f64,
    /// Inclusive membership radius in kilometers.
    pub radius_km: f64,
}

impl RegionSpec {
    /// The reference coordinate.
    #[must_use]
    pub const fn reference(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// A directory facility that falls inside a region cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMember {
    /// The member facility.
    pub facility: Facility,
    /// Distance from the region's reference point.
    pub distance_to_reference: Distance,
}

/// The set of facilities within a [`RegionSpec`]'s radius.
///
/// Membership is decided against the reference point. Every distance derived
/// from the cluster afterwards is measured from [`RegionCluster::centroid`].
#[derive(Debug, Clone)]
pub struct RegionCluster {
    spec: RegionSpec,
    members: Vec<RegionMember>,
    codes: BTreeSet<String>,
    centroid: Coordinate,
}

impl RegionCluster {
    /// Collects every facility in `directory` whose great-circle distance to
    /// the reference point is at most `spec.radius_km`.
    #[must_use]
    pub fn build(spec: RegionSpec, directory: &FacilityDirectory) -> Self {
        let reference = spec.reference();

        let mut members: Vec<RegionMember> = directory
            .iter()
            .filter_map(|facility| {
                let to_reference = distance(facility.coordinate, reference);
                (to_reference.distance_km <= spec.radius_km).then(|| RegionMember {
                    facility: facility.clone(),
                    distance_to_reference: to_reference,
                })
            })
            .collect();

        members.sort_by(|a, b| {
            a.distance_to_reference
                .distance_km
                .total_cmp(&b.distance_to_reference.distance_km)
                .then_with(|| a.facility.code.cmp(&b.facility.code))
        });

        let codes = members.iter().map(|m| m.facility.code.clone()).collect();
        let centroid = member_centroid(&members).unwrap_or(reference);

        log::debug!(
            "Region '{}' ({} km): {} member facilities",
            spec.name,
            spec.radius_km,
            members.len()
        );

        Self {
            spec,
            members,
            codes,
            centroid,
        }
    }

    /// The definition this cluster was built from.
    #[must_use]
    pub const fn spec(&self) -> &RegionSpec {
        &self.spec
    }

    /// Member facilities ordered by distance to the reference point, then
    /// code.
    #[must_use]
    pub fn members(&self) -> &[RegionMember] {
        &self.members
    }

    /// Codes of all member facilities.
    #[must_use]
    pub const fn member_codes(&self) -> &BTreeSet<String> {
        &self.codes
    }

    /// Returns `true` if the facility code belongs to the cluster.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Mean latitude/longitude of the members, or the reference point when
    /// the cluster is empty.
    #[must_use]
    pub const fn centroid(&self) -> Coordinate {
        self.centroid
    }
}

fn member_centroid(members: &[RegionMember]) -> Option<Coordinate> {
    let points: MultiPoint<f64> = members
        .iter()
        .map(|m| Point::new(m.facility.coordinate.lon, m.facility.coordinate.lat))
        .collect();
    points.centroid().map(|p| Coordinate::new(p.y(), p.x()))
}
