//! Spatial query compiler
//!
//! Every market operation maps to a fixed pair of SQL skeletons, one for the
//! legacy coordinate-list form and one for GeoJSON. A skeleton has a single
//! `{predicate}` slot which is filled from a closed set of clause shapes.
//! Request geometry is never written into the SQL text; it is returned as
//! positional arguments bound to `$1` and, with an exclusion, `$2`.

use towercast_core::models::{GeometryForm, GeometryPredicate};

use crate::rows::ColumnKind;

const PREDICATE_SLOT: &str = "{predicate}";

/// Logical market operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Number of intersecting building footprints
    BuildingCount,
    /// Average income and margin of error over intersecting buildings
    IncomeAverage,
    /// GeoJSON of intersecting building footprints
    BuildingPolygons,
    /// Providers with max advertised speeds and technology codes
    CompetitorAggregate,
    /// RDOF auction census block groups
    RdofList,
    /// State/territory codes touched by the region
    DataAvailability,
}

impl OperationKind {
    pub const ALL: [OperationKind; 6] = [
        OperationKind::BuildingCount,
        OperationKind::IncomeAverage,
        OperationKind::BuildingPolygons,
        OperationKind::CompetitorAggregate,
        OperationKind::RdofList,
        OperationKind::DataAvailability,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OperationKind::BuildingCount => "building_count",
            OperationKind::IncomeAverage => "income_average",
            OperationKind::BuildingPolygons => "building_polygons",
            OperationKind::CompetitorAggregate => "competitor_aggregate",
            OperationKind::RdofList => "rdof_list",
            OperationKind::DataAvailability => "data_availability",
        }
    }

    /// Skeleton used when the include geometry has the given form
    pub fn skeleton(self, form: GeometryForm) -> &'static QuerySkeleton {
        use GeometryForm::{CoordinateList, GeoJson};

        match (self, form) {
            (OperationKind::BuildingCount, CoordinateList) => &COUNT_LEGACY,
            (OperationKind::BuildingCount, GeoJson) => &COUNT,
            (OperationKind::IncomeAverage, _) => &INCOME,
            (OperationKind::BuildingPolygons, CoordinateList) => &POLYGONS_LEGACY,
            (OperationKind::BuildingPolygons, GeoJson) => &POLYGONS,
            (OperationKind::CompetitorAggregate, CoordinateList) => &COMPETITORS_LEGACY,
            (OperationKind::CompetitorAggregate, GeoJson) => &COMPETITORS,
            (OperationKind::RdofList, _) => &RDOF,
            (OperationKind::DataAvailability, _) => &STATES,
        }
    }
}

/// A SQL template with one predicate slot and a declared row shape
#[derive(Debug, PartialEq, Eq)]
pub struct QuerySkeleton {
    pub template: &'static str,
    /// Geography column the predicate tests
    pub geometry_column: &'static str,
    pub columns: &'static [ColumnKind],
}

impl QuerySkeleton {
    pub fn render(&self, clause: &PredicateClause) -> String {
        self.template.replacen(PREDICATE_SLOT, &clause.render(self.geometry_column), 1)
    }
}

/// Shape of the spatial predicate. The only two shapes a query can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateClause {
    /// Intersects geometry `$1`
    Intersects { include: GeometryForm },
    /// Intersects geometry `$1` AND NOT intersects geometry `$2`
    IntersectsExcluding { include: GeometryForm, exclude: GeometryForm },
}

impl PredicateClause {
    pub fn for_predicate(predicate: &GeometryPredicate) -> Self {
        let include = predicate.include.form();
        match &predicate.exclude {
            Some(exclude) => PredicateClause::IntersectsExcluding { include, exclude: exclude.form() },
            None => PredicateClause::Intersects { include },
        }
    }

    pub fn placeholder_count(&self) -> usize {
        match self {
            PredicateClause::Intersects { .. } => 1,
            PredicateClause::IntersectsExcluding { .. } => 2,
        }
    }

    fn render(&self, column: &str) -> String {
        match *self {
            PredicateClause::Intersects { include } => {
                format!("ST_Intersects({}, {})", column, geometry_expr(include, 1))
            }
            PredicateClause::IntersectsExcluding { include, exclude } => format!(
                "ST_Intersects({col}, {}) AND NOT ST_Intersects({col}, {})",
                geometry_expr(include, 1),
                geometry_expr(exclude, 2),
                col = column
            ),
        }
    }
}

/// Placeholder expression for a bound geometry. WKT text is compared as a
/// geography directly; GeoJSON goes through the database's own parser.
fn geometry_expr(form: GeometryForm, position: u8) -> &'static str {
    match (form, position) {
        (GeometryForm::CoordinateList, 1) => "$1::geography",
        (GeometryForm::GeoJson, 1) => "ST_GeomFromGeoJSON($1)",
        (GeometryForm::CoordinateList, _) => "$2::geography",
        (GeometryForm::GeoJson, _) => "ST_GeomFromGeoJSON($2)",
    }
}

/// A statement ready for an executor
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub operation: OperationKind,
    pub sql: String,
    /// Positional arguments, `args[0]` binds to `$1`
    pub args: Vec<String>,
    pub columns: &'static [ColumnKind],
}

impl CompiledQuery {
    pub fn placeholder_count(&self) -> usize {
        self.args.len()
    }
}

/// Compile a market operation against a request geometry
pub fn compile(operation: OperationKind, predicate: &GeometryPredicate) -> CompiledQuery {
    let skeleton = operation.skeleton(predicate.include.form());
    let clause = PredicateClause::for_predicate(predicate);

    let mut args = Vec::with_capacity(clause.placeholder_count());
    args.push(predicate.include.as_param().to_string());
    if let Some(exclude) = &predicate.exclude {
        args.push(exclude.as_param().to_string());
    }

    CompiledQuery {
        operation,
        sql: skeleton.render(&clause),
        args,
        columns: skeleton.columns,
    }
}

const COUNT_LEGACY: QuerySkeleton = QuerySkeleton {
    template: r#"SELECT Count(*)
FROM   (SELECT *
        FROM   microsoftfootprints
        WHERE  {predicate}
        LIMIT  10001) AS a;"#,
    geometry_column: "geog",
    columns: &[ColumnKind::Int],
};

const COUNT: QuerySkeleton = QuerySkeleton {
    template: r#"SELECT Count(*)
FROM   (SELECT *
        FROM   msftcombined
        WHERE  {predicate}
        LIMIT  10001) AS a;"#,
    geometry_column: "geog",
    columns: &[ColumnKind::Int],
};

const POLYGONS_LEGACY: QuerySkeleton = QuerySkeleton {
    template: "SELECT ST_AsGeoJSON(geog) FROM microsoftfootprints WHERE {predicate} LIMIT 10001;",
    geometry_column: "geog",
    columns: &[ColumnKind::Text],
};

const POLYGONS: QuerySkeleton = QuerySkeleton {
    template: "SELECT St_asgeojson(geog) FROM msftcombined WHERE {predicate} LIMIT 10001;",
    geometry_column: "geog",
    columns: &[ColumnKind::Text],
};

const INCOME: QuerySkeleton = QuerySkeleton {
    template: r#"SELECT Avg(avgbuildingvalues.avgincome2018building)::double precision AS avgincome2018,
       Avg(avgbuildingvalues.avgerror2018building)::double precision  AS avgerror2018
FROM   (SELECT unnested_intersecting_footprints.gid,
               Avg(tract.income2018) AS avgincome2018building,
               Avg(tract.error2018)  AS avgerror2018building
        FROM   (SELECT intersecting_footprints.*,
                       Unnest(microsoftfootprint2tracts.tractgids) AS tractgid
                FROM   (SELECT *
                        FROM   microsoftfootprints
                        WHERE  {predicate}
                        LIMIT  10001) AS intersecting_footprints
                       LEFT JOIN microsoftfootprint2tracts
                              ON intersecting_footprints.gid =
                                 microsoftfootprint2tracts.footprintgid) AS
               unnested_intersecting_footprints
               LEFT JOIN tract
                      ON tract.gid = unnested_intersecting_footprints.tractgid
        GROUP  BY unnested_intersecting_footprints.gid) AS avgbuildingvalues;"#,
    geometry_column: "microsoftfootprints.geog",
    columns: &[ColumnKind::Float, ColumnKind::Float],
};

const COMPETITORS_LEGACY: QuerySkeleton = QuerySkeleton {
    template: r#"SELECT providername,
       Max(maxaddown)::double precision     AS maxdown,
       Max(maxadup)::double precision       AS maxadup,
       Array_agg(DISTINCT techcode)::int4[] AS tech
FROM   form477jun2019
       JOIN tl_2019_blocks_census
         ON tl_2019_blocks_census.geoid10 = form477jun2019.blockcode
WHERE  {predicate}
       AND consumer > 0
GROUP  BY providername
ORDER  BY maxdown DESC
LIMIT  16;"#,
    geometry_column: "tl_2019_blocks_census.geog",
    columns: &[ColumnKind::Text, ColumnKind::Float, ColumnKind::Float, ColumnKind::IntArray],
};

const COMPETITORS: QuerySkeleton = QuerySkeleton {
    template: r#"SELECT providername,
       Max(maxaddown)::double precision     AS maxdown,
       Max(maxadup)::double precision       AS maxadup,
       Array_agg(DISTINCT techcode)::int4[] AS tech
FROM   form477jun2019
       JOIN tl_2019_blocks_census
         ON tl_2019_blocks_census.geoid10 = form477jun2019.blockcode
WHERE  {predicate}
       AND consumer > 0
GROUP  BY providername
ORDER  BY maxdown DESC
LIMIT  6;"#,
    geometry_column: "tl_2019_blocks_census.geog",
    columns: &[ColumnKind::Text, ColumnKind::Float, ColumnKind::Float, ColumnKind::IntArray],
};

const RDOF: QuerySkeleton = QuerySkeleton {
    template: r#"SELECT cbg_id::text,
       county::text,
       St_asgeojson(geog),
       reserve::double precision,
       locations::int8
FROM   auction_904_shp
WHERE  {predicate}
LIMIT  100;"#,
    geometry_column: "geog",
    columns: &[
        ColumnKind::Text,
        ColumnKind::Text,
        ColumnKind::Text,
        ColumnKind::Float,
        ColumnKind::Int,
    ],
};

const STATES: QuerySkeleton = QuerySkeleton {
    template: "SELECT geoid::text FROM tl_2017_us_state WHERE {predicate};",
    geometry_column: "geog",
    columns: &[ColumnKind::Text],
};
